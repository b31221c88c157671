//! Stratified sampler for correspondences split into groups.
//!
//! Instead of drawing the `k` indices of a minimal sample from the flat
//! index space, the draws are spread across groups as evenly as the group
//! sizes allow (see [`GroupPartition::quotas`]), and each group's share is
//! drawn uniformly without replacement from that group.

use crate::core::Sampler;
use crate::groups::GroupPartition;
use crate::samplers::UniformRandomSampler;
use crate::utils::UniformRandomGenerator;

/// Sampler balancing every minimal sample across the groups of a partition.
///
/// Falls back to flat uniform sampling when at most one group is non-empty.
#[derive(Debug, Clone, Copy)]
pub struct GroupedSampler<'a> {
    partition: &'a GroupPartition,
}

impl<'a> GroupedSampler<'a> {
    pub fn new(partition: &'a GroupPartition) -> Self {
        Self { partition }
    }

    pub fn partition(&self) -> &'a GroupPartition {
        self.partition
    }
}

impl Sampler for GroupedSampler<'_> {
    fn sample(
        &self,
        rng: &mut UniformRandomGenerator,
        point_count: usize,
        out_indices: &mut [usize],
    ) -> bool {
        if point_count != self.partition.len() {
            return false;
        }
        if self.partition.non_empty_groups() <= 1 {
            return UniformRandomSampler.sample(rng, point_count, out_indices);
        }

        // Rotate which groups receive the remainder of an uneven split.
        let offset = rng.next_seed() as usize;
        let Ok(quotas) = self.partition.quotas(out_indices.len(), offset) else {
            return false;
        };

        let mut filled = 0;
        for (group, count) in quotas.enumerate() {
            if count == 0 {
                continue;
            }
            let members = self.partition.group(group);
            // Draw positions within the group, then map them to indices.
            let slots = &mut out_indices[filled..filled + count];
            if !rng.gen_unique(slots, 0, members.len() - 1) {
                return false;
            }
            for slot in slots.iter_mut() {
                *slot = members[*slot];
            }
            filled += count;
        }
        filled == out_indices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::GroupedSampler;
    use crate::core::Sampler;
    use crate::groups::GroupPartition;
    use crate::utils::UniformRandomGenerator;

    fn two_equal_groups() -> GroupPartition {
        // Interleaved so that group membership is not an index range.
        let labels: Vec<usize> = (0..40).map(|i| i % 2).collect();
        GroupPartition::from_labels(&labels)
    }

    #[test]
    fn splits_sample_between_equal_groups() {
        let partition = two_equal_groups();
        let sampler = GroupedSampler::new(&partition);
        let mut rng = UniformRandomGenerator::from_seed(5);
        let mut sample = [0usize; 10];

        let draws = 2000;
        let mut from_first = 0usize;
        for _ in 0..draws {
            assert!(sampler.sample(&mut rng, 40, &mut sample));
            let mut sorted = sample;
            sorted.sort_unstable();
            assert!(sorted.windows(2).all(|w| w[0] != w[1]));
            from_first += sample.iter().filter(|&&i| partition.group_of(i) == 0).count();
        }
        let mean = from_first as f64 / draws as f64;
        assert!((mean - 5.0).abs() < 0.25, "mean per group {mean}");
    }

    #[test]
    fn odd_sample_size_rotates_the_remainder() {
        let partition = two_equal_groups();
        let sampler = GroupedSampler::new(&partition);
        let mut rng = UniformRandomGenerator::from_seed(9);
        let mut sample = [0usize; 3];

        let mut first_gets_two = 0usize;
        let draws = 4000;
        for _ in 0..draws {
            assert!(sampler.sample(&mut rng, 40, &mut sample));
            let n0 = sample.iter().filter(|&&i| partition.group_of(i) == 0).count();
            assert!(n0 == 1 || n0 == 2);
            if n0 == 2 {
                first_gets_two += 1;
            }
        }
        let share = first_gets_two as f64 / draws as f64;
        assert!((share - 0.5).abs() < 0.05, "share {share}");
    }

    #[test]
    fn single_group_falls_back_to_uniform() {
        let partition = GroupPartition::single(8);
        let sampler = GroupedSampler::new(&partition);
        let mut rng = UniformRandomGenerator::from_seed(1);
        let mut sample = [0usize; 8];
        assert!(sampler.sample(&mut rng, 8, &mut sample));
        sample.sort_unstable();
        assert_eq!(sample, [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn small_group_contributes_what_it_has() {
        let mut labels = vec![0usize; 1];
        labels.extend(std::iter::repeat(1).take(20));
        let partition = GroupPartition::from_labels(&labels);
        let sampler = GroupedSampler::new(&partition);
        let mut rng = UniformRandomGenerator::from_seed(2);
        let mut sample = [0usize; 6];
        for _ in 0..50 {
            assert!(sampler.sample(&mut rng, 21, &mut sample));
            assert_eq!(sample.iter().filter(|&&i| i == 0).count(), 1);
        }
    }

    #[test]
    fn uneven_quotas_map_into_their_groups() {
        let mut labels = vec![0usize];
        labels.extend((0..12).map(|i| 1 + i % 3));
        let partition = GroupPartition::from_labels(&labels);
        let sampler = GroupedSampler::new(&partition);
        let mut rng = UniformRandomGenerator::from_seed(11);
        let mut sample = [0usize; 8];
        for _ in 0..200 {
            assert!(sampler.sample(&mut rng, 13, &mut sample));
            let mut sorted = sample;
            sorted.sort_unstable();
            assert!(sorted.windows(2).all(|w| w[0] != w[1]));

            let counts = partition.inlier_counts(&sample);
            assert_eq!(counts[0], 1);
            assert!(counts[1..].iter().all(|&c| c == 2 || c == 3));
            assert_eq!(counts.iter().sum::<usize>(), 8);
        }
    }

    #[test]
    fn mismatched_point_count_is_rejected() {
        let partition = two_equal_groups();
        let sampler = GroupedSampler::new(&partition);
        let mut rng = UniformRandomGenerator::from_seed(1);
        let mut sample = [0usize; 4];
        assert!(!sampler.sample(&mut rng, 39, &mut sample));
    }
}
