//! Arm perception client composing the simulator link with the numerical
//! crates.
//!
//! The client owns a link instance and the camera intrinsics; each query
//! fetches fresh data through the link and runs it through telearm-frames or
//! telearm-cloud. Nothing is cached between calls except the tracked joint
//! angles used for relative joint moves.

use telearm_cloud::{CameraIntrinsics, PointCloud, ReconstructError, reconstruct};
use telearm_frames::{Frame, compute_frame};
use thiserror::Error;
use tracing::debug;

use crate::link::{ActuationMode, FetchError, FrameId, JointControl, SimulatorLink};

/// Errors from client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The link could not supply the data the computation needs; nothing was
    /// partially computed.
    #[error("simulator source unavailable: {0}")]
    SourceUnavailable(#[from] FetchError),

    /// Fetched buffers were structurally inconsistent with the intrinsics.
    #[error(transparent)]
    Reconstruct(#[from] ReconstructError),
}

/// Control and perception client for the simulated arm.
pub struct ArmClient<L> {
    link: L,
    intrinsics: CameraIntrinsics,
    joint_angles: Vec<f32>,
}

impl<L> ArmClient<L> {
    /// Wrap a link with the camera intrinsics used for reconstruction.
    pub fn new(link: L, intrinsics: CameraIntrinsics) -> Self {
        Self {
            link,
            intrinsics,
            joint_angles: Vec::new(),
        }
    }

    pub fn intrinsics(&self) -> &CameraIntrinsics {
        &self.intrinsics
    }

    /// Access the underlying link, e.g. to drive a scripted backend.
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Last known joint angles in radians; empty until the first refresh.
    pub fn joint_angles(&self) -> &[f32] {
        &self.joint_angles
    }
}

impl<L: SimulatorLink> ArmClient<L> {
    /// Base frame seen from the end effector, as a 3x4 transform.
    pub fn base_from_end_effector(&mut self) -> Result<Frame, ClientError> {
        self.frame_between(FrameId::Base, FrameId::EndEffector, false)
    }

    /// End effector seen from the base, as a full 4x4 homogeneous transform.
    pub fn end_effector_from_base(&mut self) -> Result<Frame, ClientError> {
        self.frame_between(FrameId::EndEffector, FrameId::Base, true)
    }

    /// Depth camera seen from the end effector, as a 3x4 transform.
    pub fn camera_from_end_effector(&mut self) -> Result<Frame, ClientError> {
        self.frame_between(FrameId::DepthCamera, FrameId::EndEffector, false)
    }

    fn frame_between(
        &mut self,
        origin: FrameId,
        target: FrameId,
        homogeneous: bool,
    ) -> Result<Frame, ClientError> {
        let sample = self.link.fetch_frame_sample(origin, target)?;
        Ok(compute_frame(sample.position, sample.quat(), homogeneous))
    }

    /// Fetch a depth/color pair and back-project it into a point cloud.
    ///
    /// Either fetch failing aborts the capture before reconstruction starts;
    /// there is no partial output.
    pub fn capture_point_cloud(&mut self) -> Result<PointCloud, ClientError> {
        let depth = self.link.fetch_depth_buffer()?;
        let color = self.link.fetch_color_buffer()?;
        debug!(
            "captured {}x{} depth frame with {}x{} color frame",
            depth.resolution_x,
            depth.resolution_y,
            color.width(),
            color.height()
        );
        Ok(reconstruct(&depth.data, &color, &self.intrinsics)?)
    }
}

impl<L: JointControl> ArmClient<L> {
    /// Re-read every joint angle from the simulator.
    pub fn refresh_joint_angles(&mut self) -> Result<&[f32], ClientError> {
        let count = self.link.joint_count();
        let mut angles = Vec::with_capacity(count);
        for joint in 0..count {
            angles.push(self.link.joint_angle(joint)?);
        }
        self.joint_angles = angles;
        Ok(&self.joint_angles)
    }

    /// Rotate `joint` by `delta_degrees` relative to its tracked angle and
    /// return the commanded absolute angle in radians.
    ///
    /// The tracked angle updates only after the simulator accepts the
    /// command. Joints are read from the simulator on first use.
    pub fn rotate_joint(
        &mut self,
        joint: usize,
        delta_degrees: f32,
        mode: ActuationMode,
    ) -> Result<f32, ClientError> {
        if self.joint_angles.is_empty() {
            self.refresh_joint_angles()?;
        }
        let current = self
            .joint_angles
            .get(joint)
            .copied()
            .ok_or(FetchError::NoSuchJoint(joint))?;
        let target = current + delta_degrees.to_radians();
        self.link.set_joint_angle(joint, target, mode)?;
        self.joint_angles[joint] = target;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::DepthFrame;
    use crate::scripted::ScriptedLink;
    use glam::Vec3;
    use image::{Rgb, RgbImage};
    use std::f32::consts::FRAC_PI_2;
    use telearm_frames::FrameSample;

    const EPS: f32 = 1e-5;

    fn pose_script() -> ScriptedLink {
        let quarter_turn = glam::Quat::from_rotation_z(FRAC_PI_2);
        let q = [quarter_turn.x, quarter_turn.y, quarter_turn.z, quarter_turn.w];
        ScriptedLink::new(6)
            .with_frame_sample(
                FrameId::Base,
                FrameId::EndEffector,
                FrameSample::new(Vec3::new(0.0, 0.0, 0.5), q),
            )
            .with_frame_sample(
                FrameId::EndEffector,
                FrameId::Base,
                FrameSample::new(Vec3::new(0.1, 0.2, 0.3), [0.0, 0.0, 0.0, 1.0]),
            )
            .with_frame_sample(
                FrameId::DepthCamera,
                FrameId::EndEffector,
                FrameSample::new(Vec3::new(0.0, 0.05, 0.0), [0.0, 0.0, 0.0, 1.0]),
            )
    }

    #[test]
    fn test_frame_queries_use_requested_shapes() {
        let mut client = ArmClient::new(pose_script(), CameraIntrinsics::default());

        let base = client.base_from_end_effector().unwrap();
        assert!(!base.matrix.is_homogeneous());
        assert_eq!(base.position, Vec3::new(0.0, 0.0, 0.5));

        let end = client.end_effector_from_base().unwrap();
        assert!(end.matrix.is_homogeneous());
        assert_eq!(
            end.matrix.to_mat4(),
            glam::Mat4::from_translation(Vec3::new(0.1, 0.2, 0.3))
        );

        let camera = client.camera_from_end_effector().unwrap();
        assert!(!camera.matrix.is_homogeneous());
        assert!((camera.position.y - 0.05).abs() < EPS);
    }

    #[test]
    fn test_missing_pose_is_source_unavailable() {
        let mut client = ArmClient::new(ScriptedLink::new(6), CameraIntrinsics::default());
        let err = client.base_from_end_effector().unwrap_err();
        assert!(matches!(
            err,
            ClientError::SourceUnavailable(FetchError::NoSuchFrame { .. })
        ));
    }

    #[test]
    fn test_capture_point_cloud() {
        let mut color = RgbImage::new(2, 1);
        color.put_pixel(0, 0, Rgb([255, 0, 0]));
        color.put_pixel(1, 0, Rgb([0, 255, 0]));
        let link = ScriptedLink::new(6)
            .with_depth_frame(DepthFrame::new(2, 1, vec![0.5, 0.5]))
            .with_color_frame(color);
        let intrinsics = CameraIntrinsics::new(2, 1, 90.0, 0.0, 1.0);

        let cloud = ArmClient::new(link, intrinsics)
            .capture_point_cloud()
            .unwrap();
        assert_eq!(cloud.len(), 2);
        assert!((cloud.points[0].position - Vec3::new(0.5, -0.25, 0.5)).length() < EPS);
    }

    #[test]
    fn test_fetch_failure_aborts_capture() {
        // Depth is scripted but color is not: the capture must fail as a
        // whole rather than reconstruct from half the data.
        let link = ScriptedLink::new(6).with_depth_frame(DepthFrame::new(1, 1, vec![0.5]));
        let mut client = ArmClient::new(link, CameraIntrinsics::new(1, 1, 90.0, 0.0, 1.0));

        let err = client.capture_point_cloud().unwrap_err();
        assert!(matches!(err, ClientError::SourceUnavailable(_)));
    }

    #[test]
    fn test_mismatched_buffers_are_rejected() {
        let link = ScriptedLink::new(6)
            .with_depth_frame(DepthFrame::new(2, 2, vec![0.5; 4]))
            .with_color_frame(RgbImage::new(2, 2));
        // Client configured for a different resolution than the link delivers.
        let mut client = ArmClient::new(link, CameraIntrinsics::new(4, 4, 57.0, 0.01, 3.5));

        let err = client.capture_point_cloud().unwrap_err();
        assert!(matches!(err, ClientError::Reconstruct(_)));
    }

    #[test]
    fn test_rotate_joint_tracks_angles() {
        let mut client = ArmClient::new(ScriptedLink::new(3), CameraIntrinsics::default());

        let commanded = client.rotate_joint(1, 90.0, ActuationMode::Direct).unwrap();
        assert!((commanded - FRAC_PI_2).abs() < EPS);
        assert!((client.joint_angles()[1] - FRAC_PI_2).abs() < EPS);
        assert!((client.link_mut().joint_state()[1] - FRAC_PI_2).abs() < EPS);

        // Deltas accumulate against the tracked angle.
        let commanded = client.rotate_joint(1, -45.0, ActuationMode::Tracked).unwrap();
        assert!((commanded - FRAC_PI_2 / 2.0).abs() < EPS);
    }

    #[test]
    fn test_rotate_unknown_joint_fails_without_tracking() {
        let mut client = ArmClient::new(ScriptedLink::new(2), CameraIntrinsics::default());
        let err = client
            .rotate_joint(5, 10.0, ActuationMode::Direct)
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::SourceUnavailable(FetchError::NoSuchJoint(5))
        ));
        assert_eq!(client.joint_angles()[..], [0.0, 0.0]);
    }

    #[test]
    fn test_refresh_reads_all_joints() {
        let mut link = ScriptedLink::new(2);
        link.set_joint_angle(0, 0.3, ActuationMode::Direct).unwrap();
        link.set_joint_angle(1, -0.7, ActuationMode::Direct).unwrap();

        let mut client = ArmClient::new(link, CameraIntrinsics::default());
        let angles = client.refresh_joint_angles().unwrap();
        assert_eq!(angles, [0.3, -0.7]);
    }
}
