//! Example: Robust point-cloud alignment using RANSAC
//!
//! This example aligns two noisy 3D point clouds related by a rigid
//! transform, with a share of the correspondences replaced by clutter.
//!
//! Run with `RUST_LOG=debug` to follow the consensus loop.

use bearing_ransac::api::estimate_point_cloud_alignment;
use bearing_ransac::models::RigidTransform;
use bearing_ransac::settings::RansacSettings;
use bearing_ransac::types::Point;
use nalgebra::{Rotation3, Vector3};
use rand::Rng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== Robust Point Cloud Alignment Example ===\n");

    let n_inliers = 120;
    let n_outliers = 60;

    let mut rng = rand::thread_rng();

    let truth = RigidTransform::from_rt(
        Rotation3::from_euler_angles(0.1, -0.3, 0.8),
        Vector3::new(1.5, -0.5, 2.0),
    );
    let (roll, pitch, yaw) = truth.rotation.euler_angles();
    println!(
        "True transform: rpy = ({roll:.3}, {pitch:.3}, {yaw:.3}), t = {:?}",
        truth.translation.vector.as_slice()
    );
    println!("Generating {n_inliers} inliers and {n_outliers} outliers\n");

    let mut points1 = Vec::new();
    let mut points2 = Vec::new();
    for i in 0..n_inliers + n_outliers {
        let p2 = Point::new(
            rng.gen_range(-5.0..5.0),
            rng.gen_range(-5.0..5.0),
            rng.gen_range(0.0..10.0),
        );
        let p1 = if i < n_inliers {
            let noise = Vector3::new(
                rng.gen_range(-0.02..0.02),
                rng.gen_range(-0.02..0.02),
                rng.gen_range(-0.02..0.02),
            );
            truth.transform_point(&p2) + noise
        } else {
            Point::new(
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-2.0..12.0),
            )
        };
        points1.push(p1);
        points2.push(p2);
    }

    let settings = RansacSettings {
        confidence: 0.999,
        ..RansacSettings::default()
    };
    let threshold = 0.1;
    let result =
        estimate_point_cloud_alignment(&points1, &points2, threshold, Some(settings))?;

    println!("RANSAC Results:");
    let (roll, pitch, yaw) = result.model.rotation.euler_angles();
    println!(
        "  Estimated: rpy = ({roll:.3}, {pitch:.3}, {yaw:.3}), t = {:?}",
        result.model.translation.vector.as_slice()
    );
    println!(
        "  Inliers: {} / {} ({:.1}%)",
        result.inliers.len(),
        points1.len(),
        100.0 * result.inliers.len() as f64 / points1.len() as f64
    );
    println!("  Iterations: {}", result.iterations);
    println!("  Residual sum over inliers: {:.4}", result.score.residual_sum);

    let true_found = result.inliers.iter().filter(|&&i| i < n_inliers).count();
    println!("  True inliers recovered: {true_found} / {n_inliers}");

    let rotation_error = result.model.rotation.angle_to(&truth.rotation);
    let translation_error = (result.model.translation.vector - truth.translation.vector).norm();
    println!("\nErrors:");
    println!("  Rotation: {:.4} deg", rotation_error.to_degrees());
    println!("  Translation: {translation_error:.4}");

    Ok(())
}
