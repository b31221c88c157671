//! High-level Rust API.
//!
//! This module provides one-call functions for the bundled problems. Each
//! one checks its inputs, builds the problem and the engine, runs it and
//! converts the outcome into a `Result`.

use nalgebra::Rotation3;

use crate::core::{EstimationResult, Ransac};
use crate::error::ConsensusError;
use crate::grouped::{GroupReport, GroupedRansac};
use crate::groups::GroupPartition;
use crate::models::RigidTransform;
use crate::problems::{PointCloudProblem, RotationOnlyProblem};
use crate::settings::RansacSettings;
use crate::threshold::Threshold;
use crate::types::{BearingVector, Point};

fn check_lengths(left: usize, right: usize) -> Result<(), ConsensusError> {
    if left != right {
        return Err(ConsensusError::MismatchedLengths { left, right });
    }
    Ok(())
}

/// Estimate the rigid transform `p1 = R * p2 + t` between two point clouds.
///
/// # Arguments
/// * `points1` - Points in the target frame
/// * `points2` - Corresponding points in the source frame
/// * `threshold` - Inlier distance, in the units of the points
/// * `settings` - Optional settings (defaults if None); their threshold is
///   replaced by `threshold`
///
/// # Returns
/// `EstimationResult` containing the transform, inliers, score, and iterations.
pub fn estimate_point_cloud_alignment(
    points1: &[Point],
    points2: &[Point],
    threshold: f64,
    settings: Option<RansacSettings>,
) -> Result<EstimationResult<RigidTransform>, ConsensusError> {
    check_lengths(points1.len(), points2.len())?;

    let settings = RansacSettings {
        threshold: Threshold::absolute(threshold),
        ..settings.unwrap_or_default()
    };
    let problem = PointCloudProblem::new(points1, points2);
    Ransac::new(settings, problem)?.run().into_result()
}

/// Estimate the rotation `f1 = R * f2` between two sets of unit bearings.
///
/// # Arguments
/// * `bearings1` - Unit bearing vectors in the first view
/// * `bearings2` - Corresponding unit bearing vectors in the second view
/// * `angular_threshold` - Maximum angle in radians between `f1` and `R * f2`
/// * `settings` - Optional settings (defaults if None); their threshold is
///   replaced by the angular one
///
/// # Returns
/// `EstimationResult` containing the rotation, inliers, score, and iterations.
pub fn estimate_relative_rotation(
    bearings1: &[BearingVector],
    bearings2: &[BearingVector],
    angular_threshold: f64,
    settings: Option<RansacSettings>,
) -> Result<EstimationResult<Rotation3<f64>>, ConsensusError> {
    check_lengths(bearings1.len(), bearings2.len())?;

    let settings = RansacSettings {
        threshold: Threshold::from_angle(angular_threshold),
        ..settings.unwrap_or_default()
    };
    let problem = RotationOnlyProblem::new(bearings1, bearings2);
    Ransac::new(settings, problem)?.run().into_result()
}

/// Point-cloud alignment with samples balanced across the groups of
/// `partition` (e.g. one group per sensor).
///
/// # Returns
/// The estimate together with the per-group breakdown of its inliers.
pub fn estimate_point_cloud_alignment_grouped(
    points1: &[Point],
    points2: &[Point],
    threshold: f64,
    partition: &GroupPartition,
    settings: Option<RansacSettings>,
) -> Result<(EstimationResult<RigidTransform>, GroupReport), ConsensusError> {
    check_lengths(points1.len(), points2.len())?;

    let settings = RansacSettings {
        threshold: Threshold::absolute(threshold),
        ..settings.unwrap_or_default()
    };
    let problem = PointCloudProblem::new(points1, points2);
    let grouped = GroupedRansac::new(settings, problem, partition)?.run();
    let estimate = grouped.result.into_result()?;
    Ok((estimate, grouped.report))
}
