//! Depth-buffer back-projection using a pinhole camera model.

use glam::Vec3;
use image::RgbImage;
use thiserror::Error;
use tracing::debug;

use crate::camera::CameraIntrinsics;
use crate::cloud::{Point, PointCloud};

/// Depth samples at or below this value carry no return and are skipped.
pub const DEPTH_VALID_MIN: f32 = 0.0001;
/// Depth samples at or above this value are clipped and are skipped.
pub const DEPTH_VALID_MAX: f32 = 0.9999;

/// Errors raised before any reconstruction work happens.
#[derive(Debug, Error)]
pub enum ReconstructError {
    #[error("depth buffer holds {actual} samples, expected {expected} for {width}x{height}")]
    MalformedDepthBuffer {
        expected: usize,
        actual: usize,
        width: u32,
        height: u32,
    },
    #[error("color buffer is {actual_width}x{actual_height}, expected {width}x{height}")]
    MalformedColorBuffer {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

fn depth_is_valid(d: f32) -> bool {
    d > DEPTH_VALID_MIN && d < DEPTH_VALID_MAX
}

/// Back-project a normalized depth buffer into a colored point cloud.
///
/// `depth` is row-major with one normalized sample per pixel; `color` shares
/// the same pixel grid. Pixels outside the open interval
/// (`DEPTH_VALID_MIN`, `DEPTH_VALID_MAX`) are omitted entirely, so the output
/// holds at most `resolution_x * resolution_y` points, in row-major scan
/// order of the surviving pixels.
///
/// Buffers whose dimensions disagree with `intrinsics` are rejected before
/// any pixel is processed.
pub fn reconstruct(
    depth: &[f32],
    color: &RgbImage,
    intrinsics: &CameraIntrinsics,
) -> Result<PointCloud, ReconstructError> {
    let rx = intrinsics.resolution_x;
    let ry = intrinsics.resolution_y;

    let expected = intrinsics.pixel_count();
    if depth.len() != expected {
        return Err(ReconstructError::MalformedDepthBuffer {
            expected,
            actual: depth.len(),
            width: rx,
            height: ry,
        });
    }
    if color.width() != rx || color.height() != ry {
        return Err(ReconstructError::MalformedColorBuffer {
            width: rx,
            height: ry,
            actual_width: color.width(),
            actual_height: color.height(),
        });
    }

    // First pass counts the survivors so the output allocates once.
    let valid = depth.iter().copied().filter(|&d| depth_is_valid(d)).count();
    debug!("valid depth samples: {} of {}", valid, expected);

    let focal = intrinsics.focal();
    let half_x = rx as f32 / 2.0;
    let half_y = ry as f32 / 2.0;
    let depth_range = intrinsics.far_clip - intrinsics.near_clip;

    let mut points = Vec::with_capacity(valid);
    for i in 0..ry {
        for j in 0..rx {
            let d = depth[(i * rx + j) as usize];
            if !depth_is_valid(d) {
                continue;
            }
            let z = intrinsics.near_clip + d * depth_range;
            // The camera's horizontal axis is mirrored relative to the pixel
            // column axis; downstream consumers depend on this handedness.
            let x = -((j as f32 - half_x) / focal) * z;
            let y = ((i as f32 - half_y) / focal) * z;
            let rgb = color.get_pixel(j, i);
            let color = Vec3::new(rgb[0] as f32, rgb[1] as f32, rgb[2] as f32) / 256.0;
            points.push(Point::new(Vec3::new(x, y, z), color));
        }
    }

    Ok(PointCloud::new(points))
}
