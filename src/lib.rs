//! # Bearing RANSAC - Robust Estimation for Geometric Vision
//!
//! `bearing_ransac` is a generic RANSAC engine for problems posed on
//! correspondences: point pairs, bearing-vector pairs, or anything else that
//! can be indexed. The engine knows a problem only through the
//! [`Problem`](core::Problem) trait, so minimal solvers live outside of it.
//!
//! ## Quick Start
//!
//! The easiest way to use `bearing_ransac` is through the high-level API functions:
//!
//! ```rust
//! use bearing_ransac::estimate_point_cloud_alignment;
//! use bearing_ransac::types::Point;
//!
//! // The second cloud is the first one shifted by (1, 2, 3)
//! let points2 = vec![
//!     Point::new(0.0, 0.0, 0.0),
//!     Point::new(1.0, 0.0, 0.0),
//!     Point::new(0.0, 1.0, 0.0),
//!     Point::new(0.0, 0.0, 1.0),
//!     Point::new(1.0, 1.0, 1.0),
//! ];
//! let points1: Vec<Point> = points2
//!     .iter()
//!     .map(|p| Point::new(p.x + 1.0, p.y + 2.0, p.z + 3.0))
//!     .collect();
//!
//! let result = estimate_point_cloud_alignment(&points1, &points2, 0.01, None).unwrap();
//! println!("Found {} inliers", result.inliers.len());
//! ```
//!
//! ## Extending the Library
//!
//! The engine is generic over three traits:
//!
//! - **[`Problem`](core::Problem)**: Implement this to add a new geometric model
//! - **[`Sampler`](core::Sampler)**: Implement this to create a custom sampling strategy
//! - **[`TerminationCriterion`](termination::TerminationCriterion)**: Implement this
//!   for custom stopping rules
//!
//! ### Example: Custom Problem
//!
//! ```rust
//! use bearing_ransac::core::{Problem, Ransac};
//! use bearing_ransac::settings::RansacSettings;
//! use bearing_ransac::threshold::Threshold;
//!
//! // Robust mean of scalars: any single value proposes a model.
//! struct Mean<'a> {
//!     values: &'a [f64],
//! }
//!
//! impl Problem for Mean<'_> {
//!     type Model = f64;
//!
//!     fn sample_size(&self) -> usize {
//!         1
//!     }
//!
//!     fn correspondence_count(&self) -> usize {
//!         self.values.len()
//!     }
//!
//!     fn compute_models(&self, sample: &[usize]) -> Vec<f64> {
//!         vec![self.values[sample[0]]]
//!     }
//!
//!     fn compute_residuals(&self, model: &f64) -> Vec<f64> {
//!         self.values.iter().map(|v| (v - model).abs()).collect()
//!     }
//!
//!     fn refine(&self, _model: &f64, inliers: &[usize]) -> f64 {
//!         inliers.iter().map(|&i| self.values[i]).sum::<f64>() / inliers.len() as f64
//!     }
//! }
//!
//! let values = [1.0, 1.1, 0.9, 1.05, 42.0];
//! let settings = RansacSettings {
//!     threshold: Threshold::absolute(0.3),
//!     seed: Some(1),
//!     ..RansacSettings::default()
//! };
//! let result = Ransac::new(settings, Mean { values: &values })
//!     .unwrap()
//!     .run();
//! assert_eq!(result.inliers, vec![0, 1, 2, 3]);
//! ```
//!
//! ## Modules
//!
//! - **[`api`](api)**: High-level API functions for the bundled problems
//! - **[`core`](core)**: Core traits and the `Ransac` engine
//! - **[`grouped`](grouped)**: Consensus with samples balanced across groups
//! - **[`groups`](groups)**: Partitions of the correspondence set
//! - **[`problems`](problems)**: Point-cloud alignment and rotation-only problems
//! - **[`samplers`](samplers)**: Built-in sampling strategies
//! - **[`scoring`](scoring)**: Inlier-count scoring
//! - **[`termination`](termination)**: Adaptive iteration bound
//! - **[`threshold`](threshold)**: Absolute and angular residual thresholds
//! - **[`settings`](settings)**: Configuration of a run

pub mod api;
pub mod core;
pub mod error;
pub mod grouped;
pub mod groups;
pub mod models;
pub mod problems;
pub mod samplers;
pub mod scoring;
pub mod settings;
pub mod termination;
pub mod threshold;
pub mod types;
pub mod utils;

// Re-export high-level API
pub use api::{
    estimate_point_cloud_alignment, estimate_point_cloud_alignment_grouped,
    estimate_relative_rotation,
};

// Re-export core types for easy access
pub use crate::core::{
    ConsensusResult, EstimationResult, Problem, Ransac, RunStatus, Sampler, StopReason,
};
pub use error::ConsensusError;
pub use grouped::{GroupReport, GroupedRansac};
pub use groups::GroupPartition;
pub use termination::TerminationCriterion;
pub use threshold::Threshold;

// Re-export settings for convenience
pub use settings::RansacSettings;
