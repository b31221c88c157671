//! Random source and small numeric helpers shared across the crate.
//!
//! The engine never touches a process-wide generator: every run owns a
//! [`UniformRandomGenerator`], seeded either from entropy or from the
//! settings, and parallel runs derive an independent stream per iteration.

use nalgebra::{Matrix3, Rotation3, Vector3};
use rand::distributions::Uniform;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Uniform integer random-number generator drawing from a seedable
/// `ChaCha8Rng`.
pub struct UniformRandomGenerator {
    rng: ChaCha8Rng,
}

impl Default for UniformRandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformRandomGenerator {
    /// Construct with a random seed (suitable for production use).
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Construct with a fixed seed (useful for tests).
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Construct from `seed` if given, otherwise from entropy.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::new(),
        }
    }

    /// Independent generator for one iteration of a seeded run.
    ///
    /// The key comes from `seed` and the ChaCha stream number is the
    /// iteration index, so a parallel run reproduces the same samples no
    /// matter which worker executes which iteration.
    pub fn for_iteration(seed: u64, iteration: usize) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(iteration as u64);
        Self { rng }
    }

    /// Draw a value uniformly from `[min, max]`.
    pub fn next_in(&mut self, min: usize, max: usize) -> usize {
        self.rng.sample(Uniform::new_inclusive(min, max))
    }

    /// Draw a fresh `u64`, used to seed derived streams.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Fill `out` with distinct integers drawn uniformly from `[min, max]`.
    ///
    /// Rejection sampling is efficient for minimal-sample sizes. For larger
    /// requests relative to the range, `rand`'s index sampling is used.
    /// Returns `false` when the range holds fewer than `out.len()` values.
    pub fn gen_unique(&mut self, out: &mut [usize], min: usize, max: usize) -> bool {
        if max < min {
            return out.is_empty();
        }
        let range = max - min + 1;
        let n = out.len();
        if n > range {
            return false;
        }

        if n * 4 > range {
            let picked = rand::seq::index::sample(&mut self.rng, range, n);
            for (slot, idx) in out.iter_mut().zip(picked.iter()) {
                *slot = min + idx;
            }
            return true;
        }

        let dist = Uniform::new_inclusive(min, max);
        for i in 0..n {
            loop {
                let candidate = self.rng.sample(dist);
                if out[..i].iter().all(|&v| v != candidate) {
                    out[i] = candidate;
                    break;
                }
            }
        }
        true
    }
}

/// Rotation `R` minimising `sum |target_i - R source_i|^2` (Kabsch).
///
/// Inputs are expected to be already centred when a translation is part of
/// the model. Returns `None` if the SVD does not converge or the
/// cross-covariance is not finite.
pub fn kabsch_rotation<I>(pairs: I) -> Option<Rotation3<f64>>
where
    I: IntoIterator<Item = (Vector3<f64>, Vector3<f64>)>,
{
    let mut h = Matrix3::<f64>::zeros();
    for (source, target) in pairs {
        h += source * target.transpose();
    }
    if h.iter().any(|x| !x.is_finite()) {
        return None;
    }

    let svd = h.svd(true, true);
    let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
        return None;
    };
    let mut v = v_t.transpose();
    let mut r = v * u.transpose();

    // Reflection: flip the axis of the smallest singular value.
    if r.determinant() < 0.0 {
        let weakest = svd.singular_values.imin();
        v.column_mut(weakest).neg_mut();
        r = v * u.transpose();
    }

    Some(Rotation3::from_matrix_unchecked(r))
}
