//! Adaptive stopping criterion.
//!
//! With inlier ratio `w`, minimal sample size `k` and desired success
//! probability `p`, the number of iterations needed to draw at least one
//! all-inlier sample with probability `p` is
//! `ceil(log(1 - p) / log(1 - w^k))`.

use crate::scoring::Score;

/// Iterations required to reach `confidence` at the given inlier ratio.
///
/// Returns `None` when the bound is not computable: no inliers yet, or `w^k`
/// so small that `1 - w^k` rounds to one. A perfect inlier ratio needs a
/// single iteration.
pub fn required_iterations(
    inlier_ratio: f64,
    sample_size: usize,
    confidence: f64,
) -> Option<usize> {
    let valid_ratio = inlier_ratio > 0.0;
    let valid_confidence = confidence > 0.0 && confidence < 1.0;
    if !valid_ratio || !valid_confidence {
        return None;
    }
    let p_good_sample = inlier_ratio.min(1.0).powi(sample_size as i32);
    if p_good_sample >= 1.0 {
        return Some(1);
    }

    let log_one_minus_conf = (1.0 - confidence).ln();
    let log_one_minus_p = (1.0 - p_good_sample).ln();
    if !log_one_minus_conf.is_finite() || !log_one_minus_p.is_finite() || log_one_minus_p == 0.0
    {
        return None;
    }

    let required = (log_one_minus_conf / log_one_minus_p).ceil();
    if required >= usize::MAX as f64 {
        return None;
    }
    Some((required as usize).max(1))
}

/// Decides when the consensus loop can stop.
pub trait TerminationCriterion {
    /// Called after every accepted improvement.
    ///
    /// May lower `max_iterations`; returns `true` to stop immediately.
    fn check(
        &mut self,
        best_score: &Score,
        correspondence_count: usize,
        sample_size: usize,
        max_iterations: &mut usize,
    ) -> bool;
}

/// Standard RANSAC criterion: lowers the iteration budget from the current
/// inlier ratio, never raising it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RansacTermination {
    /// Desired success probability in (0, 1).
    pub confidence: f64,
}

impl RansacTermination {
    pub fn new(confidence: f64) -> Self {
        Self { confidence }
    }
}

impl TerminationCriterion for RansacTermination {
    fn check(
        &mut self,
        best_score: &Score,
        correspondence_count: usize,
        sample_size: usize,
        max_iterations: &mut usize,
    ) -> bool {
        if correspondence_count == 0 {
            return false;
        }
        let inlier_ratio = best_score.inlier_count as f64 / correspondence_count as f64;
        if let Some(required) = required_iterations(inlier_ratio, sample_size, self.confidence) {
            *max_iterations = (*max_iterations).min(required);
        }
        // The loop stops on its own once the (possibly lowered) budget is spent.
        false
    }
}
