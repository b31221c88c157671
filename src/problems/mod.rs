//! Ready-made problems for the consensus engine.

pub mod point_cloud;
pub mod rotation_only;

pub use point_cloud::PointCloudProblem;
pub use rotation_only::RotationOnlyProblem;
