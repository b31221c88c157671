//! Shared aliases for correspondence data.
//!
//! The engine itself only ever sees indices; these aliases are used by the
//! bundled problems and the high-level API.

use nalgebra::{Point3, Vector3};

/// Unit-norm direction from a camera centre towards an observed point.
pub type BearingVector = Vector3<f64>;

/// A point in 3D space.
pub type Point = Point3<f64>;

/// One residual per correspondence, indexed like the correspondence set.
pub type Residuals = Vec<f64>;
