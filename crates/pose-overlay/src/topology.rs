//! Skeleton topology: which keypoints are joined by an edge.

use crate::pose::{AdjacentKeypointPair, BodyPart, Pose};

/// Provides the anatomical edges between keypoints of a [`Pose`].
///
/// This is usually supplied by the pose estimation model, since the set of edges depends on the
/// body parts the model reports.
pub trait Topology {
    /// Returns the edges whose endpoints are both present in `pose` and both have a score above
    /// `min_confidence`.
    fn adjacent_pairs(&self, pose: &Pose, min_confidence: f32) -> Vec<AdjacentKeypointPair>;
}

/// Edge list used by PoseNet.
///
/// Only limbs and torso are connected; the face keypoints are drawn as points only.
pub const POSENET_CONNECTIVITY: &[(BodyPart, BodyPart)] = {
    use BodyPart::*;
    &[
        (LeftHip, LeftShoulder),
        (LeftElbow, LeftShoulder),
        (LeftElbow, LeftWrist),
        (LeftHip, LeftKnee),
        (LeftKnee, LeftAnkle),
        (RightHip, RightShoulder),
        (RightElbow, RightShoulder),
        (RightElbow, RightWrist),
        (RightHip, RightKnee),
        (RightKnee, RightAnkle),
        (LeftShoulder, RightShoulder),
        (LeftHip, RightHip),
    ]
};

/// The skeleton topology of PoseNet's 17-keypoint model.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoseNetTopology;

impl Topology for PoseNetTopology {
    fn adjacent_pairs(&self, pose: &Pose, min_confidence: f32) -> Vec<AdjacentKeypointPair> {
        POSENET_CONNECTIVITY
            .iter()
            .filter_map(|&(a, b)| {
                let from = *pose.find(a)?;
                let to = *pose.find(b)?;
                (from.is_confident(min_confidence) && to.is_confident(min_confidence))
                    .then_some(AdjacentKeypointPair { from, to })
            })
            .collect()
    }
}
