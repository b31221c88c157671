//! Consensus over correspondences split into groups.
//!
//! [`GroupedRansac`] runs the ordinary engine with a [`GroupedSampler`] so that
//! every minimal sample draws from the groups as evenly as their sizes allow.
//! The result additionally reports how the consensus set spreads over the
//! groups, which exposes cameras that contribute no inliers at all.

use crate::core::{ConsensusResult, Problem, Ransac};
use crate::error::ConsensusError;
use crate::groups::GroupPartition;
use crate::samplers::GroupedSampler;
use crate::settings::RansacSettings;
use crate::termination::RansacTermination;

/// Per-group breakdown of a consensus set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupReport {
    /// Correspondences per group.
    pub sizes: Vec<usize>,
    /// Inliers per group.
    pub inlier_counts: Vec<usize>,
}

impl GroupReport {
    pub fn new(partition: &GroupPartition, inliers: &[usize]) -> Self {
        Self {
            sizes: partition.sizes().to_vec(),
            inlier_counts: partition.inlier_counts(inliers),
        }
    }

    /// Fraction of `group` that is inlier; 0 for an empty group.
    pub fn inlier_ratio(&self, group: usize) -> f64 {
        match self.sizes.get(group) {
            Some(&size) if size > 0 => self.inlier_counts[group] as f64 / size as f64,
            _ => 0.0,
        }
    }

    /// Non-empty groups without a single inlier.
    pub fn starved_groups(&self) -> Vec<usize> {
        self.sizes
            .iter()
            .zip(&self.inlier_counts)
            .enumerate()
            .filter(|(_, (&size, &count))| size > 0 && count == 0)
            .map(|(group, _)| group)
            .collect()
    }
}

/// Result of a grouped run.
#[derive(Debug, Clone)]
pub struct GroupedConsensusResult<M> {
    pub result: ConsensusResult<M>,
    pub report: GroupReport,
}

/// Consensus engine sampling across the groups of a [`GroupPartition`].
pub struct GroupedRansac<'a, P: Problem> {
    engine: Ransac<P, GroupedSampler<'a>, RansacTermination>,
    partition: &'a GroupPartition,
}

impl<'a, P: Problem> GroupedRansac<'a, P> {
    /// Fails with `InvalidPartition` unless `partition` covers exactly the
    /// problem's correspondences.
    pub fn new(
        settings: RansacSettings,
        problem: P,
        partition: &'a GroupPartition,
    ) -> Result<Self, ConsensusError> {
        let n = problem.correspondence_count();
        if partition.len() != n {
            return Err(ConsensusError::InvalidPartition(format!(
                "partition covers {} correspondences, problem has {n}",
                partition.len()
            )));
        }
        let termination = RansacTermination::new(settings.confidence);
        let engine = Ransac::with_components(
            settings,
            problem,
            GroupedSampler::new(partition),
            termination,
        )?;
        Ok(Self { engine, partition })
    }

    pub fn problem(&self) -> &P {
        &self.engine.problem
    }

    pub fn partition(&self) -> &'a GroupPartition {
        self.partition
    }

    pub fn run(&mut self) -> GroupedConsensusResult<P::Model> {
        let result = self.engine.run();
        self.report(result)
    }

    fn report(&self, result: ConsensusResult<P::Model>) -> GroupedConsensusResult<P::Model> {
        let report = GroupReport::new(self.partition, &result.inliers);
        GroupedConsensusResult { result, report }
    }
}

impl<P> GroupedRansac<'_, P>
where
    P: Problem + Sync,
    P::Model: Send,
{
    /// Grouped counterpart of [`Ransac::run_parallel`].
    pub fn run_parallel(&mut self) -> GroupedConsensusResult<P::Model> {
        let result = self.engine.run_parallel();
        self.report(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RunStatus;
    use crate::threshold::Threshold;
    use crate::types::Residuals;

    /// Scalar offset problem; a sample of `k` values proposes their mean.
    struct Offset {
        values: Vec<f64>,
        k: usize,
    }

    impl Problem for Offset {
        type Model = f64;

        fn sample_size(&self) -> usize {
            self.k
        }

        fn correspondence_count(&self) -> usize {
            self.values.len()
        }

        fn compute_models(&self, sample: &[usize]) -> Vec<f64> {
            let sum: f64 = sample.iter().map(|&i| self.values[i]).sum();
            vec![sum / sample.len() as f64]
        }

        fn compute_residuals(&self, model: &f64) -> Residuals {
            self.values.iter().map(|v| (v - model).abs()).collect()
        }
    }

    fn settings() -> RansacSettings {
        RansacSettings {
            threshold: Threshold::absolute(0.1),
            refine_result: false,
            seed: Some(21),
            ..RansacSettings::default()
        }
    }

    #[test]
    fn report_counts_inliers_per_group() {
        let partition = GroupPartition::from_labels(&[0, 0, 1, 1, 2]);
        let report = GroupReport::new(&partition, &[0, 2, 3]);
        assert_eq!(report.sizes, vec![2, 2, 1]);
        assert_eq!(report.inlier_counts, vec![1, 2, 0]);
        assert!((report.inlier_ratio(0) - 0.5).abs() < 1e-12);
        assert!((report.inlier_ratio(1) - 1.0).abs() < 1e-12);
        assert_eq!(report.inlier_ratio(7), 0.0);
        assert_eq!(report.starved_groups(), vec![2]);
    }

    #[test]
    fn partition_must_match_problem() {
        let partition = GroupPartition::single(3);
        let problem = Offset {
            values: vec![0.0; 4],
            k: 1,
        };
        assert!(matches!(
            GroupedRansac::new(settings(), problem, &partition),
            Err(ConsensusError::InvalidPartition(_))
        ));
    }

    #[test]
    fn starved_group_is_reported() {
        // Groups 0 and 1 agree on 1.0, group 2 is pure clutter.
        let mut values = vec![1.0; 20];
        values.extend((0..10).map(|i| 40.0 + i as f64 * 5.0));
        let labels: Vec<usize> = (0..30).map(|i| i / 10).collect();
        let partition = GroupPartition::from_labels(&labels);

        let problem = Offset { values, k: 2 };
        let mut ransac = GroupedRansac::new(settings(), problem, &partition).unwrap();
        let grouped = ransac.run();

        assert_eq!(grouped.result.status, RunStatus::Ok);
        assert_eq!(grouped.result.model, Some(1.0));
        assert_eq!(grouped.report.inlier_counts, vec![10, 10, 0]);
        assert_eq!(grouped.report.starved_groups(), vec![2]);
    }

    #[test]
    fn parallel_grouped_run_matches_itself() {
        let mut values = vec![3.0; 24];
        values.extend((0..8).map(|i| -50.0 - i as f64 * 7.0));
        let labels: Vec<usize> = (0..32).map(|i| i % 4).collect();
        let partition = GroupPartition::from_labels(&labels);

        let run = || {
            let problem = Offset {
                values: values.clone(),
                k: 4,
            };
            GroupedRansac::new(settings(), problem, &partition)
                .unwrap()
                .run_parallel()
        };
        let a = run();
        let b = run();
        assert_eq!(a.result.inliers, b.result.inliers);
        assert_eq!(a.result.iterations, b.result.iterations);
        assert_eq!(a.report, b.report);
        assert_eq!(a.report.inlier_counts.iter().sum::<usize>(), 24);
    }
}
