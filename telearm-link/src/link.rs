//! Simulator link traits and error types.

use image::RgbImage;
use telearm_frames::FrameSample;
use thiserror::Error;

/// Named coordinate frames in the simulated scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameId {
    /// Fixed base frame of the arm, anchored at the first joint.
    Base,
    /// Tool frame at the arm's wrist.
    EndEffector,
    /// Frame of the depth camera mounted on the arm.
    DepthCamera,
}

/// One fetched depth image with its declared resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthFrame {
    pub resolution_x: u32,
    pub resolution_y: u32,
    /// Row-major normalized depth samples in [0, 1].
    pub data: Vec<f32>,
}

impl DepthFrame {
    pub fn new(resolution_x: u32, resolution_y: u32, data: Vec<f32>) -> Self {
        Self {
            resolution_x,
            resolution_y,
            data,
        }
    }
}

/// Errors surfaced by a simulator link.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("connection to the simulator was lost")]
    ConnectionLost,

    #[error("simulator did not answer within the deadline")]
    Timeout,

    #[error("remote call failed with code {0}")]
    RemoteError(i32),

    #[error("no sample available for frame pair {origin:?} -> {target:?}")]
    NoSuchFrame { origin: FrameId, target: FrameId },

    #[error("joint index {0} out of range")]
    NoSuchJoint(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Blocking data-fetch surface of the simulator.
///
/// Every call either returns a ready buffer/sample or fails; retries, if the
/// backend wants any, live behind this trait. The numerical crates consume
/// exactly these three shapes and nothing else.
pub trait SimulatorLink {
    /// Pose of the `origin` frame expressed in the `target` frame.
    fn fetch_frame_sample(
        &mut self,
        origin: FrameId,
        target: FrameId,
    ) -> Result<FrameSample, FetchError>;

    /// Latest depth image from the arm-mounted camera.
    fn fetch_depth_buffer(&mut self) -> Result<DepthFrame, FetchError>;

    /// Latest RGB image co-registered with the depth image.
    fn fetch_color_buffer(&mut self) -> Result<RgbImage, FetchError>;
}

/// How a joint command is applied by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuationMode {
    /// Set the joint angle instantly, bypassing dynamics.
    Direct,
    /// Hand the angle to the joint controller as a target position.
    Tracked,
}

/// Joint read and actuation surface of the simulator.
pub trait JointControl {
    /// Number of actuated joints in the arm.
    fn joint_count(&self) -> usize;

    /// Current angle of `joint` in radians.
    fn joint_angle(&mut self, joint: usize) -> Result<f32, FetchError>;

    /// Command `joint` to the absolute angle `radians`.
    fn set_joint_angle(
        &mut self,
        joint: usize,
        radians: f32,
        mode: ActuationMode,
    ) -> Result<(), FetchError>;
}
