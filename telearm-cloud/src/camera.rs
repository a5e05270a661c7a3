//! Pinhole camera intrinsics for the simulated RGB-D sensor.

use serde::{Deserialize, Serialize};

/// Intrinsic parameters of the simulated RGB-D camera.
///
/// `perspective_angle` is the full field of view in degrees along the longer
/// sensor axis. A single focal length derived from it applies to both axes
/// (square-pixel pinhole assumption), even for non-square sensors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    /// Horizontal pixel count.
    pub resolution_x: u32,
    /// Vertical pixel count.
    pub resolution_y: u32,
    /// Full field of view in degrees along the longer axis.
    pub perspective_angle: f32,
    /// Near clip distance in scene units.
    pub near_clip: f32,
    /// Far clip distance in scene units.
    pub far_clip: f32,
}

impl CameraIntrinsics {
    /// Create intrinsics from resolution, field of view, and clip distances.
    pub fn new(
        resolution_x: u32,
        resolution_y: u32,
        perspective_angle: f32,
        near_clip: f32,
        far_clip: f32,
    ) -> Self {
        Self {
            resolution_x,
            resolution_y,
            perspective_angle,
            near_clip,
            far_clip,
        }
    }

    /// Shared focal length in pixels, derived from the longer axis.
    pub fn focal(&self) -> f32 {
        let longer = self.resolution_x.max(self.resolution_y) as f32;
        (longer / 2.0) / (self.perspective_angle.to_radians() / 2.0).tan()
    }

    /// Total pixel count of one frame.
    pub fn pixel_count(&self) -> usize {
        self.resolution_x as usize * self.resolution_y as usize
    }
}

impl Default for CameraIntrinsics {
    /// The simulated Kinect sensor the arm carries: 640x480, 57 degree FOV,
    /// clip planes at 0.01 and 3.5 scene units.
    fn default() -> Self {
        Self::new(640, 480, 57.0, 0.01, 3.5)
    }
}
