//! Relative rotation between two views from bearing-vector pairs.
//!
//! For a camera that only rotates (or for points at infinity) corresponding
//! unit bearings satisfy `f1 = R * f2`. Two non-parallel pairs fix `R`.

use nalgebra::Rotation3;

use crate::core::Problem;
use crate::types::{BearingVector, Residuals};
use crate::utils::kabsch_rotation;

/// Minimum `|f_a x f_b|` for the two bearings of a sample (about 0.06 deg).
const MIN_BEARING_SEPARATION: f64 = 1e-3;

/// Rotation-only problem on unit bearing vectors.
///
/// The residual `1 - f1 · (R f2)` pairs with [`Threshold::from_angle`].
///
/// [`Threshold::from_angle`]: crate::threshold::Threshold::from_angle
#[derive(Debug, Clone, Copy)]
pub struct RotationOnlyProblem<'a> {
    bearings1: &'a [BearingVector],
    bearings2: &'a [BearingVector],
}

impl<'a> RotationOnlyProblem<'a> {
    /// Bearings are expected to be unit length.
    pub fn new(bearings1: &'a [BearingVector], bearings2: &'a [BearingVector]) -> Self {
        Self {
            bearings1,
            bearings2,
        }
    }

    fn fit(&self, indices: &[usize]) -> Option<Rotation3<f64>> {
        if indices.len() < 2 {
            return None;
        }
        kabsch_rotation(indices.iter().map(|&i| (self.bearings2[i], self.bearings1[i])))
    }
}

fn separated(a: &BearingVector, b: &BearingVector) -> bool {
    a.cross(b).norm() > MIN_BEARING_SEPARATION
}

impl Problem for RotationOnlyProblem<'_> {
    type Model = Rotation3<f64>;

    fn sample_size(&self) -> usize {
        2
    }

    fn correspondence_count(&self) -> usize {
        self.bearings1.len().min(self.bearings2.len())
    }

    fn is_sample_good(&self, sample: &[usize]) -> bool {
        let [a, b] = sample else {
            return false;
        };
        separated(&self.bearings1[*a], &self.bearings1[*b])
            && separated(&self.bearings2[*a], &self.bearings2[*b])
    }

    fn compute_models(&self, sample: &[usize]) -> Vec<Rotation3<f64>> {
        self.fit(sample).into_iter().collect()
    }

    fn is_valid_model(&self, model: &Rotation3<f64>) -> bool {
        model.matrix().iter().all(|v| v.is_finite())
    }

    fn compute_residuals(&self, model: &Rotation3<f64>) -> Residuals {
        self.bearings1
            .iter()
            .zip(self.bearings2)
            .map(|(f1, f2)| 1.0 - f1.dot(&(model * f2)))
            .collect()
    }

    fn refine(&self, model: &Rotation3<f64>, inliers: &[usize]) -> Rotation3<f64> {
        self.fit(inliers).unwrap_or(*model)
    }
}

#[cfg(test)]
mod tests {
    use super::RotationOnlyProblem;
    use crate::core::Problem;
    use crate::threshold::Threshold;
    use crate::types::BearingVector;
    use approx::assert_relative_eq;
    use nalgebra::Rotation3;

    fn bearings(truth: &Rotation3<f64>) -> (Vec<BearingVector>, Vec<BearingVector>) {
        let bearings2: Vec<BearingVector> = (0..10)
            .map(|i| {
                let f = i as f64;
                let x = (f * 0.3).sin() * 0.4;
                let y = (f * 0.5).cos() * 0.3;
                BearingVector::new(x, y, 1.0).normalize()
            })
            .collect();
        let bearings1 = bearings2.iter().map(|f| truth * f).collect();
        (bearings1, bearings2)
    }

    #[test]
    fn two_pairs_fix_the_rotation() {
        let truth = Rotation3::from_euler_angles(0.05, -0.1, 0.3);
        let (bearings1, bearings2) = bearings(&truth);
        let problem = RotationOnlyProblem::new(&bearings1, &bearings2);

        assert!(problem.is_sample_good(&[1, 8]));
        let models = problem.compute_models(&[1, 8]);
        assert_eq!(models.len(), 1);
        assert_relative_eq!(models[0].matrix(), truth.matrix(), epsilon = 1e-9);

        let threshold = Threshold::from_angle(1e-4);
        let residuals = problem.compute_residuals(&models[0]);
        assert!(residuals.iter().all(|&r| threshold.is_inlier(r)));
    }

    #[test]
    fn parallel_bearings_are_degenerate() {
        let f = BearingVector::new(0.1, 0.2, 1.0).normalize();
        let g = BearingVector::new(-0.3, 0.1, 1.0).normalize();
        let bearings1 = vec![f, f, g];
        let bearings2 = vec![f, f, g];
        let problem = RotationOnlyProblem::new(&bearings1, &bearings2);
        assert!(!problem.is_sample_good(&[0, 1]));
        assert!(problem.is_sample_good(&[0, 2]));
    }

    #[test]
    fn residual_grows_with_angle() {
        let truth = Rotation3::identity();
        let (bearings1, bearings2) = bearings(&truth);
        let problem = RotationOnlyProblem::new(&bearings1, &bearings2);

        let off = Rotation3::from_euler_angles(0.0, 0.02, 0.0);
        let residuals = problem.compute_residuals(&off);
        // Every bearing is rotated by at most 0.02 rad.
        let cutoff = Threshold::from_angle(0.0201);
        assert!(residuals.iter().all(|&r| r > 0.0 && cutoff.is_inlier(r)));
    }
}
