//! Detected hand keypoints and the fixed 21-joint hand topology.

use serde::{Deserialize, Serialize};

/// Number of keypoints a hand detector reports per hand.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// A single detected hand joint.
///
/// `x` and `y` are relative to the image size and nominally lie in `[0, 1]`,
/// although detectors do report values slightly outside that range for joints
/// near the image border. `z` (relative depth) is carried through but never
/// used for classification.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

impl Keypoint {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: None }
    }
}

/// Names for the hand landmarks, in detector output order.
///
/// - **CMC**: carpometacarpal joint, the lowest joint of the thumb.
/// - **MCP**: metacarpophalangeal joint, the knuckles near the palm.
/// - **PIP** / **IP**: (proximal) interphalangeal joint.
/// - **DIP**: distal interphalangeal joint, the highest joint of a finger.
/// - **Tip**: placed on the tip of the finger, above the DIP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandLandmark {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl HandLandmark {
    pub const ALL: [HandLandmark; HAND_LANDMARK_COUNT] = {
        use HandLandmark::*;
        [
            Wrist,
            ThumbCmc,
            ThumbMcp,
            ThumbIp,
            ThumbTip,
            IndexFingerMcp,
            IndexFingerPip,
            IndexFingerDip,
            IndexFingerTip,
            MiddleFingerMcp,
            MiddleFingerPip,
            MiddleFingerDip,
            MiddleFingerTip,
            RingFingerMcp,
            RingFingerPip,
            RingFingerDip,
            RingFingerTip,
            PinkyMcp,
            PinkyPip,
            PinkyDip,
            PinkyTip,
        ]
    };

    /// Position of this joint in a detector's output.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Errors raised when building a [`Hand`] from raw detector output.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HandError {
    #[error("hand must have {expected} keypoints, got {got}")]
    KeypointCount { expected: usize, got: usize },
}

/// One detected hand: exactly [`HAND_LANDMARK_COUNT`] keypoints in detector order.
///
/// Joint 0 ([`HandLandmark::Wrist`]) is the normalization origin, so the
/// order of `keypoints` is significant and never changed after construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Keypoint>", into = "Vec<Keypoint>")]
pub struct Hand {
    keypoints: Vec<Keypoint>,
}

impl Hand {
    /// Validate the keypoint count and build a hand.
    pub fn new(keypoints: Vec<Keypoint>) -> Result<Self, HandError> {
        if keypoints.len() != HAND_LANDMARK_COUNT {
            return Err(HandError::KeypointCount {
                expected: HAND_LANDMARK_COUNT,
                got: keypoints.len(),
            });
        }
        Ok(Self { keypoints })
    }

    /// Keypoints in detector order.
    #[inline]
    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }

    #[inline]
    pub fn keypoint(&self, landmark: HandLandmark) -> Keypoint {
        self.keypoints[landmark.index()]
    }

    #[inline]
    pub fn wrist(&self) -> Keypoint {
        self.keypoint(HandLandmark::Wrist)
    }
}

impl TryFrom<Vec<Keypoint>> for Hand {
    type Error = HandError;

    fn try_from(keypoints: Vec<Keypoint>) -> Result<Self, Self::Error> {
        Hand::new(keypoints)
    }
}

impl From<Hand> for Vec<Keypoint> {
    fn from(hand: Hand) -> Self {
        hand.keypoints
    }
}
