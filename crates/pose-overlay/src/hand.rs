//! Hand presence detection.

use crate::pose::{BodyPart, Pose};

/// The keypoints whose confidence indicates a visible hand.
pub const HAND_KEYPOINTS: [BodyPart; 2] = [BodyPart::LeftWrist, BodyPart::RightWrist];

/// Returns whether either wrist of `pose` scores above `min_confidence`.
///
/// A wrist missing from the pose counts as not detected (score 0.0). The estimator is expected
/// to always report both, so a missing wrist is logged.
pub fn hand_present(pose: &Pose, min_confidence: f32) -> bool {
    HAND_KEYPOINTS.into_iter().any(|part| {
        let score = match pose.require(part) {
            Ok(kp) => kp.score(),
            Err(e) => {
                log::warn!("{e}, treating it as not detected");
                0.0
            }
        };
        score > min_confidence
    })
}
