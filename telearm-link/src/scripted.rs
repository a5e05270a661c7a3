//! In-memory scripted link for tests and demos.

use std::collections::{HashMap, VecDeque};

use image::RgbImage;
use telearm_frames::FrameSample;
use tracing::debug;

use crate::link::{ActuationMode, DepthFrame, FetchError, FrameId, JointControl, SimulatorLink};

/// A canned simulator link replaying preloaded data.
///
/// Frame samples are keyed by `(origin, target)` and persist across fetches;
/// depth and color buffers are consumed front to back so a script can step
/// through a capture sequence. An exhausted buffer script reports a lost
/// connection, which is how fetch-failure paths get exercised in tests.
#[derive(Debug, Default)]
pub struct ScriptedLink {
    frames: HashMap<(FrameId, FrameId), FrameSample>,
    depth_frames: VecDeque<DepthFrame>,
    color_frames: VecDeque<RgbImage>,
    joints: Vec<f32>,
}

impl ScriptedLink {
    /// Create a link driving an arm with `joint_count` joints, all at zero.
    pub fn new(joint_count: usize) -> Self {
        Self {
            joints: vec![0.0; joint_count],
            ..Self::default()
        }
    }

    /// Script the pose returned for a frame pair.
    pub fn with_frame_sample(
        mut self,
        origin: FrameId,
        target: FrameId,
        sample: FrameSample,
    ) -> Self {
        self.frames.insert((origin, target), sample);
        self
    }

    /// Queue a depth frame for the next `fetch_depth_buffer` call.
    pub fn with_depth_frame(mut self, frame: DepthFrame) -> Self {
        self.depth_frames.push_back(frame);
        self
    }

    /// Queue a color frame for the next `fetch_color_buffer` call.
    pub fn with_color_frame(mut self, image: RgbImage) -> Self {
        self.color_frames.push_back(image);
        self
    }

    /// Angles the scripted joints currently hold, in radians.
    pub fn joint_state(&self) -> &[f32] {
        &self.joints
    }
}

impl SimulatorLink for ScriptedLink {
    fn fetch_frame_sample(
        &mut self,
        origin: FrameId,
        target: FrameId,
    ) -> Result<FrameSample, FetchError> {
        self.frames
            .get(&(origin, target))
            .copied()
            .ok_or(FetchError::NoSuchFrame { origin, target })
    }

    fn fetch_depth_buffer(&mut self) -> Result<DepthFrame, FetchError> {
        self.depth_frames
            .pop_front()
            .ok_or(FetchError::ConnectionLost)
    }

    fn fetch_color_buffer(&mut self) -> Result<RgbImage, FetchError> {
        self.color_frames
            .pop_front()
            .ok_or(FetchError::ConnectionLost)
    }
}

impl JointControl for ScriptedLink {
    fn joint_count(&self) -> usize {
        self.joints.len()
    }

    fn joint_angle(&mut self, joint: usize) -> Result<f32, FetchError> {
        self.joints
            .get(joint)
            .copied()
            .ok_or(FetchError::NoSuchJoint(joint))
    }

    fn set_joint_angle(
        &mut self,
        joint: usize,
        radians: f32,
        mode: ActuationMode,
    ) -> Result<(), FetchError> {
        let slot = self
            .joints
            .get_mut(joint)
            .ok_or(FetchError::NoSuchJoint(joint))?;
        *slot = radians;
        debug!("joint {} set to {} rad ({:?})", joint, radians, mode);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_frame_samples_persist() {
        let sample = FrameSample::new(Vec3::new(0.1, 0.2, 0.3), [0.0, 0.0, 0.0, 1.0]);
        let mut link = ScriptedLink::new(6).with_frame_sample(
            FrameId::Base,
            FrameId::EndEffector,
            sample,
        );

        for _ in 0..3 {
            let fetched = link
                .fetch_frame_sample(FrameId::Base, FrameId::EndEffector)
                .unwrap();
            assert_eq!(fetched, sample);
        }
        assert!(matches!(
            link.fetch_frame_sample(FrameId::DepthCamera, FrameId::Base),
            Err(FetchError::NoSuchFrame { .. })
        ));
    }

    #[test]
    fn test_buffers_are_consumed_in_order() {
        let mut link = ScriptedLink::new(0)
            .with_depth_frame(DepthFrame::new(1, 1, vec![0.25]))
            .with_depth_frame(DepthFrame::new(1, 1, vec![0.75]));

        assert_eq!(link.fetch_depth_buffer().unwrap().data, vec![0.25]);
        assert_eq!(link.fetch_depth_buffer().unwrap().data, vec![0.75]);
        assert!(matches!(
            link.fetch_depth_buffer(),
            Err(FetchError::ConnectionLost)
        ));
    }

    #[test]
    fn test_joint_actuation_updates_state() {
        let mut link = ScriptedLink::new(2);
        link.set_joint_angle(1, 1.5, ActuationMode::Direct).unwrap();
        assert_eq!(link.joint_angle(1).unwrap(), 1.5);
        assert_eq!(link.joint_angle(0).unwrap(), 0.0);
        assert!(matches!(
            link.set_joint_angle(2, 0.0, ActuationMode::Tracked),
            Err(FetchError::NoSuchJoint(2))
        ));
    }
}
