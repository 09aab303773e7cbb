//! Core types for hand-sign recognition.
//!
//! This crate turns the keypoints of one detected hand into the
//! translation- and scale-invariant feature vector a sign classifier
//! consumes. It does *not* depend on any concrete hand detector, image
//! decoder, or inference runtime.
//!
//! ```
//! use signhand_core::{Hand, Keypoint, LandmarkNormalizer, HAND_LANDMARK_COUNT};
//!
//! let mut points = vec![Keypoint::new(0.1, 0.1); HAND_LANDMARK_COUNT];
//! points[1] = Keypoint::new(0.6, 0.1);
//! let hand = Hand::new(points).unwrap();
//!
//! let out = LandmarkNormalizer::default().normalize_hand(&hand, 100, 100).unwrap();
//! assert_eq!(&out.features.as_slice()[..4], &[0.0, 0.0, 1.0, 0.0]);
//! ```

mod hand;
mod image;
mod logger;
mod normalize;

pub use hand::{Hand, HandError, HandLandmark, Keypoint, HAND_LANDMARK_COUNT};
pub use image::RgbImageView;
pub use normalize::{
    normalize, to_pixel_landmarks, try_normalize, FeatureVector, LandmarkNormalizer,
    NormalizeError, NormalizedHand, NormalizerParams, PixelClamp, PixelLandmarks,
};

/// Length of the feature vector produced for one [`Hand`].
pub const FEATURE_LEN: usize = HAND_LANDMARK_COUNT * 2;

pub use logger::{init_logging, resolve_level, LogInitError, LogSettings, LOG_ENV_VAR};
