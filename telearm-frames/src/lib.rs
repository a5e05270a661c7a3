//! Telearm Frames
//!
//! Rigid-body frame math for the arm perception client: quaternion to
//! rotation-matrix conversion, rigid transform assembly, and the composition
//! of raw pose samples into base/end-effector/camera frame transforms.
//!
//! All functions here are pure and synchronous. Pose data comes from the
//! simulator link in telearm-link; nothing in this crate performs I/O.

pub mod provider;
pub mod rotation;

pub use provider::{Frame, FrameSample, compute_frame};
pub use rotation::{FrameMatrix, assemble_transform, quaternion_to_rotation_matrix};
