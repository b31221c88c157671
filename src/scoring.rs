//! Consensus scoring.
//!
//! A hypothesis is scored by the size of its consensus set. Among hypotheses
//! with the same consensus size, the one with the smaller summed residual
//! over its consensus set is the better local fit.

use std::cmp::Ordering;

use crate::threshold::Threshold;

/// Quality of a hypothesis: consensus-set size and residual sum over it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub inlier_count: usize,
    pub residual_sum: f64,
}

impl Score {
    pub fn new(inlier_count: usize, residual_sum: f64) -> Self {
        Self {
            inlier_count,
            residual_sum,
        }
    }

    /// Strictly larger consensus, or equal consensus with a smaller residual sum.
    pub fn is_better_than(&self, other: &Score) -> bool {
        matches!(self.partial_cmp(other), Some(Ordering::Greater))
    }
}

/// Orders scores so that "greater" means "better".
impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.inlier_count.cmp(&other.inlier_count) {
            Ordering::Equal => other.residual_sum.partial_cmp(&self.residual_sum),
            ord => Some(ord),
        }
    }
}

/// RANSAC-style scoring that counts residuals below a [`Threshold`].
#[derive(Debug, Clone, Copy)]
pub struct InlierCountScoring {
    threshold: Threshold,
}

impl InlierCountScoring {
    pub fn new(threshold: Threshold) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Score a residual vector and write its consensus set into `inliers_out`.
    ///
    /// Non-finite residuals never count as inliers.
    pub fn score(&self, residuals: &[f64], inliers_out: &mut Vec<usize>) -> Score {
        inliers_out.clear();
        let mut residual_sum = 0.0;
        for (i, &r) in residuals.iter().enumerate() {
            if self.threshold.is_inlier(r) {
                inliers_out.push(i);
                residual_sum += r;
            }
        }
        Score::new(inliers_out.len(), residual_sum)
    }
}

#[cfg(test)]
mod tests {
    use super::{InlierCountScoring, Score};
    use crate::threshold::Threshold;

    #[test]
    fn inlier_count_scoring_counts_correctly() {
        let residuals = [0.1, 0.4, 0.6, 1.0, 0.3, f64::NAN];
        let scoring = InlierCountScoring::new(Threshold::absolute(0.5));
        let mut inliers = Vec::new();
        let s = scoring.score(&residuals, &mut inliers);

        assert_eq!(s.inlier_count, 3);
        assert!((s.residual_sum - 0.8).abs() < 1e-12);
        assert_eq!(inliers, vec![0, 1, 4]);
    }

    #[test]
    fn negative_infinity_is_not_an_inlier() {
        let scoring = InlierCountScoring::new(Threshold::absolute(0.5));
        let mut inliers = Vec::new();
        let s = scoring.score(&[0.1, f64::NEG_INFINITY, 0.2], &mut inliers);

        assert_eq!(inliers, vec![0, 2]);
        assert_eq!(s.inlier_count, 2);
        assert!((s.residual_sum - 0.3).abs() < 1e-12);
        assert!(!s.is_better_than(&Score::new(2, 0.25)));
    }

    #[test]
    fn larger_consensus_wins_then_smaller_residual() {
        let big = Score::new(10, 5.0);
        let small = Score::new(9, 0.1);
        assert!(big.is_better_than(&small));
        assert!(!small.is_better_than(&big));

        let tight = Score::new(10, 1.0);
        assert!(tight.is_better_than(&big));
        assert!(!big.is_better_than(&tight));

        assert!(!big.is_better_than(&big));
    }
}
