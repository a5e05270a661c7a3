//! Telearm Cloud
//!
//! Reconstruction of colored 3D point clouds from the simulated RGB-D
//! camera's depth and color buffers, using a shared-focal pinhole model.
//!
//! The reconstructor is a pure function over ready buffers: fetching them
//! from the simulator is the link layer's job (telearm-link).

pub mod camera;
pub mod cloud;
pub mod reconstruct;

pub use camera::CameraIntrinsics;
pub use cloud::{Point, PointCloud};
pub use reconstruct::{DEPTH_VALID_MAX, DEPTH_VALID_MIN, ReconstructError, reconstruct};
