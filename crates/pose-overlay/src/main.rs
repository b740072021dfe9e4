//! Runs the overlay on a still image with a scripted sequence of poses.
//!
//! Usage: `pose-overlay [IMAGE]`. Without an image, a blank 480x360 frame is used. If
//! `POSE_OVERLAY_SNAPSHOT` is set, the frame with the overlay on top is written to that path once
//! per second.

use std::{
    env,
    path::PathBuf,
    time::{Duration, Instant},
};

use pose_overlay::{
    estimator::ReplayEstimator,
    frame_loop::FrameLoop,
    image::{Color, Image, Resolution},
    options::OverlayOptions,
    pose::{BodyPart, Keypoint, Pose, Position},
    ui::{LogLabel, UiSinks},
};

/// Number of poses in one raise-and-lower cycle of the arms.
const SCRIPT_LEN: usize = 120;

fn main() -> anyhow::Result<()> {
    pose_overlay::init_logger!();

    let frame = match env::args_os().nth(1) {
        Some(path) => Image::load(&path)?,
        None => Image::filled(Resolution::RES_360P, Color::BLACK),
    };
    let snapshot = env::var_os("POSE_OVERLAY_SNAPSHOT").map(PathBuf::from);

    let sinks = UiSinks::new()
        .torch_switch(LogLabel::new("torch"))
        .torch_text(LogLabel::new("hand"))
        .info(LogLabel::new("info"));
    let overlay = Image::new(frame.width(), frame.height());

    let mut frame_loop = FrameLoop::new(
        frame.clone(),
        ReplayEstimator::new(script(frame.resolution())),
        overlay,
        sinks,
        OverlayOptions::from_env(),
    )?;

    let mut last_snapshot = Instant::now();
    frame_loop.run_with(move |frame_loop, _| {
        let Some(path) = &snapshot else { return };
        if last_snapshot.elapsed() < Duration::from_secs(1) {
            return;
        }
        last_snapshot = Instant::now();

        let mut composite = frame.clone();
        composite.overlay(frame_loop.surface());
        if let Err(e) = composite.save(path) {
            log::error!("failed to write snapshot to '{}': {e:#}", path.display());
        }
    })
}

/// A figure standing in the middle of the frame, raising and lowering both arms.
///
/// The wrists' scores follow the arms: they are confidently visible while raised and fade out
/// while lowered, so the hand detection switches on and off.
fn script(res: Resolution) -> Vec<Pose> {
    let (w, h) = (res.width() as f32, res.height() as f32);
    let at = |x: f32, y: f32| Position::new(w * x, h * y);

    (0..SCRIPT_LEN)
        .map(|i| {
            // 0 at the start and end of the cycle, 1 in the middle.
            let raise = 1.0 - (i as f32 / SCRIPT_LEN as f32 * 2.0 - 1.0).abs();
            let wrist_y = 0.55 - 0.4 * raise;
            let elbow_y = 0.45 - 0.15 * raise;

            BodyPart::ALL
                .into_iter()
                .map(|part| {
                    use BodyPart::*;
                    let (position, score) = match part {
                        Nose => (at(0.5, 0.18), 0.95),
                        LeftEye => (at(0.52, 0.15), 0.9),
                        RightEye => (at(0.48, 0.15), 0.9),
                        LeftEar => (at(0.55, 0.17), 0.6),
                        RightEar => (at(0.45, 0.17), 0.6),
                        LeftShoulder => (at(0.6, 0.3), 0.9),
                        RightShoulder => (at(0.4, 0.3), 0.9),
                        LeftElbow => (at(0.68, elbow_y), 0.8),
                        RightElbow => (at(0.32, elbow_y), 0.8),
                        LeftWrist => (at(0.72, wrist_y), 0.2 + 0.7 * raise),
                        RightWrist => (at(0.28, wrist_y), 0.1 + 0.6 * raise),
                        LeftHip => (at(0.57, 0.6), 0.7),
                        RightHip => (at(0.43, 0.6), 0.7),
                        LeftKnee => (at(0.58, 0.78), 0.4),
                        RightKnee => (at(0.42, 0.78), 0.4),
                        LeftAnkle => (at(0.58, 0.95), 0.2),
                        RightAnkle => (at(0.42, 0.95), 0.2),
                    };
                    Keypoint::new(part, position, score)
                })
                .collect()
        })
        .collect()
}
