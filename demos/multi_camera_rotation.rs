//! Example: Relative rotation of a multi-camera rig with grouped sampling
//!
//! A rig of four cameras rotates in place. Each camera contributes its own
//! bearing-vector correspondences; one camera has a broken feature matcher
//! and produces nothing but outliers. Grouped sampling draws every minimal
//! sample across cameras, and the group report exposes the broken one.
//!
//! Run with `RUST_LOG=debug` to follow the consensus loop.

use bearing_ransac::grouped::GroupedRansac;
use bearing_ransac::groups::GroupPartition;
use bearing_ransac::problems::RotationOnlyProblem;
use bearing_ransac::settings::RansacSettings;
use bearing_ransac::threshold::Threshold;
use bearing_ransac::types::BearingVector;
use nalgebra::{Rotation3, Vector3};
use rand::Rng;

const CAMERAS: usize = 4;
const BROKEN_CAMERA: usize = 3;
const FOCAL_LENGTH: f64 = 600.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== Multi-Camera Rotation Example ===\n");

    let mut rng = rand::thread_rng();
    let truth = Rotation3::from_euler_angles(0.02, 0.15, -0.04);

    let mut bearings1 = Vec::new();
    let mut bearings2 = Vec::new();
    let mut labels = Vec::new();
    for camera in 0..CAMERAS {
        // Cameras look in different directions around the rig.
        let heading = camera as f64 * std::f64::consts::FRAC_PI_2;
        let mount = Rotation3::from_euler_angles(0.0, heading, 0.0);
        let count = rng.gen_range(20..60);
        for _ in 0..count {
            let pixel_x: f64 = rng.gen_range(-320.0..320.0);
            let pixel_y: f64 = rng.gen_range(-240.0..240.0);
            let f2: BearingVector =
                mount * Vector3::new(pixel_x, pixel_y, FOCAL_LENGTH).normalize();

            let f1 = if camera == BROKEN_CAMERA {
                let x: f64 = rng.gen_range(-1.0..1.0);
                let y: f64 = rng.gen_range(-1.0..1.0);
                mount * Vector3::new(x, y, 1.0).normalize()
            } else {
                // Half a pixel of jitter on the matched bearing.
                let dx: f64 = rng.gen_range(-0.5..0.5);
                let dy: f64 = rng.gen_range(-0.5..0.5);
                let jitter = mount * Vector3::new(dx, dy, 0.0) / FOCAL_LENGTH;
                (truth * f2 + jitter).normalize()
            };
            bearings1.push(f1);
            bearings2.push(f2);
            labels.push(camera);
        }
    }

    let partition = GroupPartition::from_labels(&labels);
    println!("Correspondences per camera: {:?}", partition.sizes());

    let settings = RansacSettings::with_threshold(Threshold::from_pixels(2.0, FOCAL_LENGTH));
    let problem = RotationOnlyProblem::new(&bearings1, &bearings2);
    let mut ransac = GroupedRansac::new(settings, problem, &partition)?;
    let grouped = ransac.run();

    println!(
        "\nRun finished: {:?} ({:?})",
        grouped.result.status, grouped.result.stop_reason
    );
    println!("  Iterations: {}", grouped.result.iterations);

    let estimate = grouped.result.into_result()?;
    println!(
        "  Rotation error: {:.4} deg",
        estimate.model.angle_to(&truth).to_degrees()
    );
    println!("  Inliers: {} / {}", estimate.inliers.len(), partition.len());

    println!("\nPer-camera consensus:");
    for camera in 0..partition.group_count() {
        println!(
            "  camera {camera}: {:>3} / {:>3} inliers ({:.0}%)",
            grouped.report.inlier_counts[camera],
            grouped.report.sizes[camera],
            100.0 * grouped.report.inlier_ratio(camera)
        );
    }
    let starved = grouped.report.starved_groups();
    if !starved.is_empty() {
        println!("\nCameras without a single inlier: {starved:?}");
    }

    Ok(())
}
