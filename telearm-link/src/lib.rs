//! Telearm Link - simulator access for the arm perception client
//!
//! This crate defines the data-fetch contract the numerical crates consume
//! (`SimulatorLink`), the joint actuation surface (`JointControl`), and the
//! `ArmClient` that composes both with telearm-frames and telearm-cloud.
//!
//! A real vendor-API backend would implement the two traits; the crate ships
//! a `ScriptedLink` backend replaying canned data for tests and demos.
//!
//! ## Example
//!
//! ```ignore
//! use telearm_cloud::CameraIntrinsics;
//! use telearm_link::{ArmClient, ScriptedLink};
//!
//! let link = ScriptedLink::new(6);
//! let mut client = ArmClient::new(link, CameraIntrinsics::default());
//! let cloud = client.capture_point_cloud()?;
//! let end_effector = client.end_effector_from_base()?;
//! ```

mod client;
mod link;
mod scripted;

pub use client::{ArmClient, ClientError};
pub use link::{ActuationMode, DepthFrame, FetchError, FrameId, JointControl, SimulatorLink};
pub use scripted::ScriptedLink;

// Re-export the sample type links hand back, for convenience.
pub use telearm_frames::FrameSample;
