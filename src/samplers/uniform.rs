//! Uniform random sampler drawing minimal samples without replacement.

use crate::core::Sampler;
use crate::utils::UniformRandomGenerator;

/// Uniform random sampler drawing minimal samples without replacement.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformRandomSampler;

impl Sampler for UniformRandomSampler {
    fn sample(
        &self,
        rng: &mut UniformRandomGenerator,
        point_count: usize,
        out_indices: &mut [usize],
    ) -> bool {
        let sample_size = out_indices.len();
        if sample_size == 0 || point_count == 0 || sample_size > point_count {
            return false;
        }
        rng.gen_unique(out_indices, 0, point_count - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::UniformRandomSampler;
    use crate::core::Sampler;
    use crate::utils::UniformRandomGenerator;

    #[test]
    fn draws_distinct_indices_in_range() {
        let mut rng = UniformRandomGenerator::from_seed(3);
        let mut sample = [0usize; 5];
        for _ in 0..200 {
            assert!(UniformRandomSampler.sample(&mut rng, 12, &mut sample));
            assert!(sample.iter().all(|&i| i < 12));
            let mut sorted = sample;
            sorted.sort_unstable();
            assert!(sorted.windows(2).all(|w| w[0] != w[1]));
        }
    }

    #[test]
    fn refuses_oversized_samples() {
        let mut rng = UniformRandomGenerator::from_seed(3);
        let mut sample = [0usize; 5];
        assert!(!UniformRandomSampler.sample(&mut rng, 4, &mut sample));
        assert!(!UniformRandomSampler.sample(&mut rng, 0, &mut sample));
    }

    #[test]
    fn every_index_is_drawn_about_equally() {
        let mut rng = UniformRandomGenerator::from_seed(11);
        let mut sample = [0usize; 3];
        let mut counts = [0usize; 10];
        let draws = 10_000;
        for _ in 0..draws {
            assert!(UniformRandomSampler.sample(&mut rng, 10, &mut sample));
            for &i in &sample {
                counts[i] += 1;
            }
        }
        // Expected 3000 per index.
        for c in counts {
            assert!((2700..3300).contains(&c), "count {c} far from 3000");
        }
    }
}
