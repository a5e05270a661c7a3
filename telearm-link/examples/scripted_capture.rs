//! Replay a canned capture sequence through the scripted link: reconstruct a
//! point cloud, query the frame transforms, and nudge a joint.

use glam::Vec3;
use image::{Rgb, RgbImage};
use telearm_cloud::CameraIntrinsics;
use telearm_link::{ActuationMode, ArmClient, DepthFrame, FrameId, FrameSample, ScriptedLink};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let intrinsics = CameraIntrinsics::new(64, 48, 57.0, 0.01, 3.5);

    // A depth ramp with an invalid border, plus a color gradient.
    let mut depth = vec![1.0; intrinsics.pixel_count()];
    let mut color = RgbImage::new(intrinsics.resolution_x, intrinsics.resolution_y);
    for i in 1..intrinsics.resolution_y - 1 {
        for j in 1..intrinsics.resolution_x - 1 {
            depth[(i * intrinsics.resolution_x + j) as usize] =
                0.2 + 0.6 * (j as f32 / intrinsics.resolution_x as f32);
            color.put_pixel(j, i, Rgb([(4 * j) as u8, (5 * i) as u8, 128]));
        }
    }

    let link = ScriptedLink::new(6)
        .with_frame_sample(
            FrameId::EndEffector,
            FrameId::Base,
            FrameSample::new(Vec3::new(0.4, 0.0, 0.6), [0.0, 0.0, 0.0, 1.0]),
        )
        .with_frame_sample(
            FrameId::DepthCamera,
            FrameId::EndEffector,
            FrameSample::new(Vec3::new(0.0, 0.08, 0.02), [0.0, 0.0, 0.0, 1.0]),
        )
        .with_depth_frame(DepthFrame::new(
            intrinsics.resolution_x,
            intrinsics.resolution_y,
            depth,
        ))
        .with_color_frame(color);

    let mut client = ArmClient::new(link, intrinsics);

    let cloud = client.capture_point_cloud()?;
    info!("reconstructed {} points", cloud.len());

    let end_effector = client.end_effector_from_base()?;
    info!("end effector sits at {:?}", end_effector.position);

    let camera = client.camera_from_end_effector()?;
    info!("camera offset from wrist: {:?}", camera.position);

    let commanded = client.rotate_joint(0, 15.0, ActuationMode::Tracked)?;
    info!("joint 0 commanded to {:.4} rad", commanded);

    Ok(())
}
