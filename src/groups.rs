//! Partition of the correspondence set into groups.
//!
//! In multi-camera setups each camera (or camera pair) contributes its own
//! block of correspondences. A [`GroupPartition`] records which block every
//! index belongs to so that samples can be balanced across groups and
//! consensus can be reported per group.

use crate::error::ConsensusError;

/// Disjoint cover of `[0, N)` by groups identified by `0..group_count()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPartition {
    groups: Vec<Vec<usize>>,
    labels: Vec<usize>,
    sizes: Vec<usize>,
}

impl GroupPartition {
    /// Build a partition of `[0, point_count)` from explicit index lists.
    ///
    /// Fails unless every index appears in exactly one group.
    pub fn new(groups: Vec<Vec<usize>>, point_count: usize) -> Result<Self, ConsensusError> {
        let mut labels = vec![usize::MAX; point_count];
        for (group_id, members) in groups.iter().enumerate() {
            for &idx in members {
                let Some(label) = labels.get_mut(idx) else {
                    return Err(ConsensusError::InvalidPartition(format!(
                        "index {idx} in group {group_id} is out of range for {point_count} correspondences"
                    )));
                };
                if *label != usize::MAX {
                    return Err(ConsensusError::InvalidPartition(format!(
                        "index {idx} belongs to groups {} and {group_id}",
                        *label
                    )));
                }
                *label = group_id;
            }
        }
        if let Some(missing) = labels.iter().position(|&l| l == usize::MAX) {
            return Err(ConsensusError::InvalidPartition(format!(
                "index {missing} is not assigned to any group"
            )));
        }
        Ok(Self::from_parts(groups, labels))
    }

    fn from_parts(groups: Vec<Vec<usize>>, labels: Vec<usize>) -> Self {
        let sizes = groups.iter().map(Vec::len).collect();
        Self {
            groups,
            labels,
            sizes,
        }
    }

    /// Build a partition from one group label per correspondence.
    pub fn from_labels(labels: &[usize]) -> Self {
        let group_count = labels.iter().max().map_or(0, |&m| m + 1);
        let mut groups = vec![Vec::new(); group_count];
        for (idx, &label) in labels.iter().enumerate() {
            groups[label].push(idx);
        }
        Self::from_parts(groups, labels.to_vec())
    }

    /// Single group holding every index.
    pub fn single(point_count: usize) -> Self {
        Self::from_parts(vec![(0..point_count).collect()], vec![0; point_count])
    }

    /// Number of correspondences covered.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Indices belonging to `group`.
    pub fn group(&self, group: usize) -> &[usize] {
        &self.groups[group]
    }

    /// Group id of correspondence `idx`.
    pub fn group_of(&self, idx: usize) -> usize {
        self.labels[idx]
    }

    /// Number of correspondences in each group.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Groups holding at least one correspondence.
    pub fn non_empty_groups(&self) -> usize {
        self.sizes.iter().filter(|&&s| s > 0).count()
    }

    /// Split `sample_size` draws across groups as evenly as sizes allow.
    ///
    /// Draws are water-filled: every non-empty group gets an equal share,
    /// capped at its size, and what a small group cannot absorb is spread
    /// over the others. A remainder smaller than the number of open groups
    /// is handed out round-robin starting at `offset`, which lets the
    /// sampler rotate it between draws.
    pub fn allocate(
        &self,
        sample_size: usize,
        offset: usize,
    ) -> Result<Vec<usize>, ConsensusError> {
        Ok(self.quotas(sample_size, offset)?.collect())
    }

    /// Same split as [`allocate`](Self::allocate), yielded group by group
    /// without allocating.
    pub fn quotas(
        &self,
        sample_size: usize,
        offset: usize,
    ) -> Result<impl Iterator<Item = usize> + '_, ConsensusError> {
        if sample_size > self.len() {
            return Err(ConsensusError::InsufficientData {
                required: sample_size,
                available: self.len(),
            });
        }

        let level = self.fill_level(sample_size);
        let filled: usize = self.sizes.iter().map(|&s| s.min(level)).sum();
        let remainder = sample_size - filled;
        // Groups still below their size once every group holds `level`.
        let open = self.sizes.iter().filter(|&&s| s > level).count();
        let start = if open == 0 { 0 } else { offset % open };

        let mut position = 0;
        Ok(self.sizes.iter().map(move |&size| {
            if size <= level {
                return size;
            }
            let slot = (position + open - start) % open;
            position += 1;
            level + usize::from(slot < remainder)
        }))
    }

    /// Largest per-group level whose capped total fits in `sample_size`.
    fn fill_level(&self, sample_size: usize) -> usize {
        let capacity =
            |level: usize| -> usize { self.sizes.iter().map(|&s| s.min(level)).sum() };
        let (mut lo, mut hi) = (0, self.sizes.iter().copied().max().unwrap_or(0));
        while lo < hi {
            let mid = lo + (hi - lo + 1) / 2;
            if capacity(mid) <= sample_size {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        lo
    }

    /// Count `inliers` per group.
    pub fn inlier_counts(&self, inliers: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.groups.len()];
        for &idx in inliers {
            counts[self.labels[idx]] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::GroupPartition;
    use crate::error::ConsensusError;

    #[test]
    fn rejects_overlaps_and_gaps() {
        let overlap = GroupPartition::new(vec![vec![0, 1], vec![1, 2]], 3);
        assert!(matches!(overlap, Err(ConsensusError::InvalidPartition(_))));

        let gap = GroupPartition::new(vec![vec![0], vec![2]], 3);
        assert!(matches!(gap, Err(ConsensusError::InvalidPartition(_))));

        let out_of_range = GroupPartition::new(vec![vec![0, 1, 5]], 3);
        assert!(matches!(out_of_range, Err(ConsensusError::InvalidPartition(_))));

        let ok = GroupPartition::new(vec![vec![2, 0], vec![1]], 3).unwrap();
        assert_eq!(ok.group_of(0), 0);
        assert_eq!(ok.group_of(1), 1);
        assert_eq!(ok.sizes(), &[2, 1]);
    }

    #[test]
    fn labels_round_trip() {
        let p = GroupPartition::from_labels(&[1, 0, 1, 3]);
        assert_eq!(p.group_count(), 4);
        assert_eq!(p.group(1), &[0, 2]);
        assert_eq!(p.non_empty_groups(), 3);
        assert_eq!(p.inlier_counts(&[0, 2, 3]), vec![0, 2, 0, 1]);
    }

    #[test]
    fn equal_groups_split_evenly() {
        let labels: Vec<usize> = (0..20).map(|i| i / 10).collect();
        let p = GroupPartition::from_labels(&labels);
        assert_eq!(p.allocate(16, 0).unwrap(), vec![8, 8]);
        assert_eq!(p.allocate(10, 0).unwrap(), vec![5, 5]);
        assert_eq!(p.allocate(3, 0).unwrap(), vec![2, 1]);
        assert_eq!(p.allocate(3, 1).unwrap(), vec![1, 2]);
    }

    #[test]
    fn small_groups_spill_over() {
        let mut labels = vec![0usize; 2];
        labels.extend(std::iter::repeat(1).take(10));
        labels.extend(std::iter::repeat(2).take(10));
        let p = GroupPartition::from_labels(&labels);

        let quota = p.allocate(12, 0).unwrap();
        assert_eq!(quota, vec![2, 5, 5]);
        assert_eq!(quota.iter().sum::<usize>(), 12);

        assert!(p.allocate(23, 0).is_err());
        assert_eq!(p.allocate(22, 0).unwrap(), vec![2, 10, 10]);
    }

    #[test]
    fn empty_groups_get_nothing() {
        let p = GroupPartition::new(vec![vec![0, 1, 2], vec![], vec![3, 4, 5]], 6).unwrap();
        assert_eq!(p.allocate(4, 0).unwrap(), vec![2, 0, 2]);
    }

    #[test]
    fn remainder_goes_to_open_groups_only() {
        let p = GroupPartition::new(
            vec![vec![0], vec![1, 2, 3, 4], vec![5, 6, 7, 8], vec![9, 10, 11, 12]],
            13,
        )
        .unwrap();
        assert_eq!(p.allocate(8, 0).unwrap(), vec![1, 3, 2, 2]);
        assert_eq!(p.allocate(8, 2).unwrap(), vec![1, 2, 2, 3]);
        assert_eq!(p.allocate(8, 3).unwrap(), vec![1, 3, 2, 2]);
        assert_eq!(p.quotas(8, 1).unwrap().sum::<usize>(), 8);
    }

    #[test]
    fn huge_offset_wraps_around() {
        let labels: Vec<usize> = (0..20).map(|i| i / 10).collect();
        let p = GroupPartition::from_labels(&labels);
        // usize::MAX is odd, so the remainder starts at the second group.
        assert_eq!(p.allocate(3, usize::MAX).unwrap(), vec![1, 2]);
        assert_eq!(p.allocate(3, usize::MAX - 1).unwrap(), vec![2, 1]);

        let three: Vec<usize> = (0..30).map(|i| i / 10).collect();
        let p = GroupPartition::from_labels(&three);
        let quota = p.allocate(4, usize::MAX).unwrap();
        assert_eq!(quota.iter().sum::<usize>(), 4);
        assert!(quota.iter().all(|&q| q == 1 || q == 2));
    }
}
