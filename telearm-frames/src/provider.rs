//! Composition of raw pose samples into frame transforms.
//!
//! The simulator link hands back a position plus an orientation quaternion
//! for a pair of scene frames; this module turns that pair into the transform
//! shape the caller needs and keeps the intermediates around for diagnostics.

use glam::{Mat3, Quat, Vec3};

use crate::rotation::{FrameMatrix, assemble_transform, quaternion_to_rotation_matrix};

/// Raw pose sample as supplied by the simulator link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    /// Position of the origin frame expressed in the target frame.
    pub position: Vec3,
    /// Orientation quaternion (x, y, z, w).
    pub rotation: [f32; 4],
}

impl FrameSample {
    /// Create a new pose sample.
    pub fn new(position: Vec3, rotation: [f32; 4]) -> Self {
        Self { position, rotation }
    }

    /// Orientation as a glam quaternion.
    pub fn quat(&self) -> Quat {
        Quat::from_xyzw(
            self.rotation[0],
            self.rotation[1],
            self.rotation[2],
            self.rotation[3],
        )
    }
}

/// A computed frame transform with its intermediates exposed.
///
/// `rotation` and `position` repeat the inputs that built `matrix` so callers
/// needing only one of them do not have to take the transform apart again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// The assembled transform, 3x4 or 4x4 depending on the request.
    pub matrix: FrameMatrix,
    /// The rotation block on its own.
    pub rotation: Mat3,
    /// The translation column on its own.
    pub position: Vec3,
}

impl Frame {
    /// Build a frame transform straight from a link pose sample.
    pub fn from_sample(sample: &FrameSample, homogeneous: bool) -> Self {
        compute_frame(sample.position, sample.quat(), homogeneous)
    }
}

/// Convert `rotation` through the rotation codec, assemble the transform, and
/// return it together with the intermediate rotation matrix and raw position.
pub fn compute_frame(position: Vec3, rotation: Quat, homogeneous: bool) -> Frame {
    let rotation_matrix = quaternion_to_rotation_matrix(rotation);
    Frame {
        matrix: assemble_transform(rotation_matrix, position, homogeneous),
        rotation: rotation_matrix,
        position,
    }
}
