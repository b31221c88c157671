//! Model types produced by the bundled problems.

use nalgebra::{Matrix4, Rotation3, Translation3, UnitQuaternion, Vector3};

use crate::types::Point;

/// Rigid transform in 3D (rotation + translation).
///
/// Maps points of the second cloud into the frame of the first:
/// `p1 = R * p2 + t`.
#[derive(Clone, Debug, PartialEq)]
pub struct RigidTransform {
    pub rotation: UnitQuaternion<f64>,
    pub translation: Translation3<f64>,
}

impl RigidTransform {
    pub fn new(rotation: UnitQuaternion<f64>, translation: Translation3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn from_rt(r: Rotation3<f64>, t: Vector3<f64>) -> Self {
        Self::new(UnitQuaternion::from_rotation_matrix(&r), Translation3::from(t))
    }

    pub fn identity() -> Self {
        Self::new(UnitQuaternion::identity(), Translation3::identity())
    }

    /// Apply the transform to a point of the second cloud.
    pub fn transform_point(&self, p: &Point) -> Point {
        self.translation * (self.rotation * p)
    }

    pub fn to_matrix4(&self) -> Matrix4<f64> {
        let r = self.rotation.to_homogeneous();
        let t = self.translation.to_homogeneous();
        t * r
    }

    /// All parameters are finite.
    pub fn is_finite(&self) -> bool {
        self.rotation.coords.iter().all(|v| v.is_finite())
            && self.translation.vector.iter().all(|v| v.is_finite())
    }
}
