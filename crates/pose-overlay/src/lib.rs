//! Live pose overlay.
//!
//! This library draws the keypoints and skeleton of an estimated body pose on top of a camera
//! feed, detects whether a hand is visible and mirrors that to a set of UI elements. The camera,
//! the pose estimation model and the UI toolkit are external collaborators, plugged in through
//! the [`FrameSource`], [`PoseEstimator`], [`Surface`], [`Toggle`] and [`TextSink`] traits.
//!
//! [`FrameLoop`] ties everything together and runs one estimate/draw/publish cycle per display
//! refresh.
//!
//! # Environment Variables
//!
//! [`OverlayOptions::from_env`] reads the following variables:
//!
//! * `POSE_OVERLAY_MIN_CONFIDENCE`: score a keypoint has to exceed to be drawn or to count as a
//!   detected hand. A number between 0 and 1, defaults to 0.5.
//! * `POSE_OVERLAY_LAMP`: `1` or `true` draws a light bulb indicator in the top right corner,
//!   lit while a hand is detected. Off by default.
//! * `POSE_OVERLAY_FPS`: display refresh rate the loop is paced to. Defaults to 60.
//!
//! [`FrameSource`]: source::FrameSource
//! [`PoseEstimator`]: estimator::PoseEstimator
//! [`Surface`]: surface::Surface
//! [`Toggle`]: ui::Toggle
//! [`TextSink`]: ui::TextSink
//! [`FrameLoop`]: frame_loop::FrameLoop
//! [`OverlayOptions::from_env`]: options::OverlayOptions::from_env

use log::LevelFilter;

pub mod estimator;
pub mod frame_loop;
pub mod hand;
pub mod options;
pub mod pose;
pub mod render;
pub mod schedule;
pub mod source;
pub mod surface;
pub mod timer;
pub mod topology;
pub mod ui;

pub use overlay_image as image;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_CRATE_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate and this library log at *debug* level. `RUST_LOG` can override this.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
