//! Rigid alignment of two 3D point clouds using Procrustes analysis.

use nalgebra::Vector3;

use crate::core::Problem;
use crate::models::RigidTransform;
use crate::types::{Point, Residuals};
use crate::utils::kabsch_rotation;

/// Minimum squared area (times four) of a sample triangle.
const MIN_TRIANGLE_AREA_SQ: f64 = 1e-12;

/// Rigid transform between 3D–3D correspondences, `p1 = R * p2 + t`.
///
/// Residuals are Euclidean distances in the frame of the first cloud.
#[derive(Debug, Clone, Copy)]
pub struct PointCloudProblem<'a> {
    points1: &'a [Point],
    points2: &'a [Point],
}

impl<'a> PointCloudProblem<'a> {
    /// Both slices must be of equal length; extra points of the longer one
    /// are ignored.
    pub fn new(points1: &'a [Point], points2: &'a [Point]) -> Self {
        Self { points1, points2 }
    }

    /// Procrustes fit over the given correspondences.
    fn fit(&self, indices: &[usize]) -> Option<RigidTransform> {
        if indices.len() < 3 {
            return None;
        }
        let n = indices.len() as f64;
        let mut c1 = Vector3::zeros();
        let mut c2 = Vector3::zeros();
        for &i in indices {
            c1 += self.points1[i].coords;
            c2 += self.points2[i].coords;
        }
        c1 /= n;
        c2 /= n;

        let rotation = kabsch_rotation(
            indices
                .iter()
                .map(|&i| (self.points2[i].coords - c2, self.points1[i].coords - c1)),
        )?;
        let transform = RigidTransform::from_rt(rotation, c1 - rotation * c2);
        transform.is_finite().then_some(transform)
    }
}

/// Twice the triangle area, squared; zero for collinear points.
fn collinearity(a: &Point, b: &Point, c: &Point) -> f64 {
    (b - a).cross(&(c - a)).norm_squared()
}

impl Problem for PointCloudProblem<'_> {
    type Model = RigidTransform;

    fn sample_size(&self) -> usize {
        3
    }

    fn correspondence_count(&self) -> usize {
        self.points1.len().min(self.points2.len())
    }

    fn is_sample_good(&self, sample: &[usize]) -> bool {
        let [a, b, c] = sample else {
            return false;
        };
        collinearity(&self.points1[*a], &self.points1[*b], &self.points1[*c])
            > MIN_TRIANGLE_AREA_SQ
            && collinearity(&self.points2[*a], &self.points2[*b], &self.points2[*c])
                > MIN_TRIANGLE_AREA_SQ
    }

    fn compute_models(&self, sample: &[usize]) -> Vec<RigidTransform> {
        self.fit(sample).into_iter().collect()
    }

    fn is_valid_model(&self, model: &RigidTransform) -> bool {
        model.is_finite()
    }

    fn compute_residuals(&self, model: &RigidTransform) -> Residuals {
        self.points1
            .iter()
            .zip(self.points2)
            .map(|(p1, p2)| (p1 - model.transform_point(p2)).norm())
            .collect()
    }

    fn refine(&self, model: &RigidTransform, inliers: &[usize]) -> RigidTransform {
        self.fit(inliers).unwrap_or_else(|| model.clone())
    }
}
