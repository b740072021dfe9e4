//! Pose estimation output: named keypoints with positions and confidence scores.

use std::{error::Error, fmt, str::FromStr};

/// The 17 body parts reported by PoseNet-style single-pose estimators, in estimator order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum BodyPart {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl BodyPart {
    pub const COUNT: usize = 17;

    /// All body parts, in estimator order.
    pub const ALL: [BodyPart; Self::COUNT] = {
        use BodyPart::*;
        [
            Nose,
            LeftEye,
            RightEye,
            LeftEar,
            RightEar,
            LeftShoulder,
            RightShoulder,
            LeftElbow,
            RightElbow,
            LeftWrist,
            RightWrist,
            LeftHip,
            RightHip,
            LeftKnee,
            RightKnee,
            LeftAnkle,
            RightAnkle,
        ]
    };

    /// Returns the part's camelCase name, as used by the estimator and drawn as a label.
    pub fn name(self) -> &'static str {
        use BodyPart::*;
        match self {
            Nose => "nose",
            LeftEye => "leftEye",
            RightEye => "rightEye",
            LeftEar => "leftEar",
            RightEar => "rightEar",
            LeftShoulder => "leftShoulder",
            RightShoulder => "rightShoulder",
            LeftElbow => "leftElbow",
            RightElbow => "rightElbow",
            LeftWrist => "leftWrist",
            RightWrist => "rightWrist",
            LeftHip => "leftHip",
            RightHip => "rightHip",
            LeftKnee => "leftKnee",
            RightKnee => "rightKnee",
            LeftAnkle => "leftAnkle",
            RightAnkle => "rightAnkle",
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BodyPart {
    type Err = UnknownBodyPart;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|part| part.name() == s)
            .ok_or_else(|| UnknownBodyPart { name: s.to_string() })
    }
}

/// Error returned when parsing a [`BodyPart`] from a name the estimator does not use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBodyPart {
    name: String,
}

impl fmt::Display for UnknownBodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown body part '{}'", self.name)
    }
}

impl Error for UnknownBodyPart {}

/// A position on the drawing surface, in pixels.
///
/// X points to the right, Y points down. Positions are not validated and may lie outside of the
/// surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns `self` moved by `(dx, dy)`.
    #[inline]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A named body landmark with its position and confidence score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    part: BodyPart,
    position: Position,
    score: f32,
}

impl Keypoint {
    pub fn new(part: BodyPart, position: Position, score: f32) -> Self {
        Self {
            part,
            position,
            score,
        }
    }

    #[inline]
    pub fn part(&self) -> BodyPart {
        self.part
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Confidence score, by convention in range 0.0 to 1.0.
    #[inline]
    pub fn score(&self) -> f32 {
        self.score
    }

    /// Returns whether the score is strictly greater than `min_confidence`.
    #[inline]
    pub fn is_confident(&self, min_confidence: f32) -> bool {
        self.score > min_confidence
    }
}

/// Two keypoints joined by an anatomical edge of the skeleton.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjacentKeypointPair {
    pub from: Keypoint,
    pub to: Keypoint,
}

/// Error returned by [`Pose::require`] when the estimator did not report a body part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingKeypoint {
    part: BodyPart,
}

impl MissingKeypoint {
    pub fn part(&self) -> BodyPart {
        self.part
    }
}

impl fmt::Display for MissingKeypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pose has no '{}' keypoint", self.part)
    }
}

impl Error for MissingKeypoint {}

/// The keypoints of a single detected subject in one frame, in estimator order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pose {
    keypoints: Vec<Keypoint>,
}

impl Pose {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self { keypoints }
    }

    /// Creates a pose containing every [`BodyPart`], all at `position` with score `score`.
    pub fn uniform(position: Position, score: f32) -> Self {
        Self::new(
            BodyPart::ALL
                .into_iter()
                .map(|part| Keypoint::new(part, position, score))
                .collect(),
        )
    }

    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }

    /// Looks up the keypoint for `part`.
    ///
    /// If the estimator reported the same part more than once, the first entry wins.
    pub fn find(&self, part: BodyPart) -> Option<&Keypoint> {
        self.keypoints.iter().find(|kp| kp.part == part)
    }

    /// Looks up the keypoint for `part`, treating its absence as an error.
    pub fn require(&self, part: BodyPart) -> Result<&Keypoint, MissingKeypoint> {
        self.find(part).ok_or(MissingKeypoint { part })
    }

    /// Returns the score of `part`, or 0.0 if the pose does not contain it.
    pub fn score(&self, part: BodyPart) -> f32 {
        self.find(part).map_or(0.0, |kp| kp.score)
    }

    /// Iterates over the keypoints whose score is above `min_confidence`.
    pub fn confident(&self, min_confidence: f32) -> impl Iterator<Item = &Keypoint> + '_ {
        self.keypoints
            .iter()
            .filter(move |kp| kp.is_confident(min_confidence))
    }

    /// Counts the keypoints whose score is above `min_confidence`.
    pub fn count_confident(&self, min_confidence: f32) -> usize {
        self.confident(min_confidence).count()
    }

    /// Replaces the score of `part`, returning the modified pose.
    ///
    /// Does nothing if the pose does not contain `part`.
    pub fn with_score(mut self, part: BodyPart, score: f32) -> Self {
        if let Some(kp) = self.keypoints.iter_mut().find(|kp| kp.part == part) {
            kp.score = score;
        }
        self
    }

    /// Removes `part` from the pose, returning the modified pose.
    pub fn without(mut self, part: BodyPart) -> Self {
        self.keypoints.retain(|kp| kp.part != part);
        self
    }
}

impl FromIterator<Keypoint> for Pose {
    fn from_iter<T: IntoIterator<Item = Keypoint>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
