//! Keypoint normalization: image-relative keypoints -> pixel landmarks -> feature vector.
//!
//! The feature vector is invariant to where the hand sits in the image
//! (translation, via the wrist origin) and to how large it appears (scale, via
//! the largest absolute delta).

use crate::hand::{Hand, Keypoint};
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// How keypoint coordinates are clamped when converted to pixels.
///
/// The upper bound (`dimension - 1`) is always enforced. Negative
/// coordinates are kept as-is under [`PixelClamp::UpperOnly`], which is how
/// the training landmark lists for existing classifiers were produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelClamp {
    #[default]
    UpperOnly,
    Both,
}

/// Normalizer configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizerParams {
    #[serde(default)]
    pub pixel_clamp: PixelClamp,
}

/// Normalization errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("image has zero extent (width={width}, height={height})")]
    EmptyImage { width: u32, height: u32 },
    /// Every landmark coincides with the origin; there is no scale to divide by.
    #[error("degenerate landmarks: all deltas from the origin are zero")]
    Degenerate,
}

/// Integer pixel positions of a hand's landmarks, in detector order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PixelLandmarks(Vec<Point2<i32>>);

impl PixelLandmarks {
    pub fn new(points: Vec<Point2<i32>>) -> Self {
        Self(points)
    }

    #[inline]
    pub fn points(&self) -> &[Point2<i32>] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Flat `[dx0, dy0, dx1, dy1, ...]` feature vector fed to the classifier.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest absolute component, `0.0` for an empty vector.
    pub fn max_abs(&self) -> f32 {
        self.0.iter().fold(0.0f32, |acc, v| acc.max(v.abs()))
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.0
    }
}

impl AsRef<[f32]> for FeatureVector {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

/// Convert image-relative keypoints to integer pixel coordinates.
///
/// `px = min(floor(x * width), width - 1)` and likewise for `y`. The lower
/// bound is only applied with [`PixelClamp::Both`].
pub fn to_pixel_landmarks(
    keypoints: &[Keypoint],
    width: u32,
    height: u32,
    clamp: PixelClamp,
) -> Result<PixelLandmarks, NormalizeError> {
    if width == 0 || height == 0 {
        return Err(NormalizeError::EmptyImage { width, height });
    }

    let points = keypoints
        .iter()
        .map(|kp| {
            Point2::new(
                to_pixel(kp.x, width, clamp),
                to_pixel(kp.y, height, clamp),
            )
        })
        .collect();
    Ok(PixelLandmarks(points))
}

#[inline]
fn to_pixel(rel: f32, extent: u32, clamp: PixelClamp) -> i32 {
    let max = f64::from(extent - 1);
    let mut px = (f64::from(rel) * f64::from(extent)).floor().min(max);
    if clamp == PixelClamp::Both {
        px = px.max(0.0);
    }
    // NaN maps to 0, out-of-range values saturate.
    px as i32
}

/// Translate landmarks so the first one is the origin, flatten, and divide
/// by the largest absolute component.
///
/// Returns [`NormalizeError::Degenerate`] when every landmark coincides with
/// the origin. An empty input yields an empty vector.
pub fn try_normalize(landmarks: &PixelLandmarks) -> Result<FeatureVector, NormalizeError> {
    let deltas = origin_deltas(landmarks);
    if deltas.is_empty() {
        return Ok(FeatureVector::default());
    }

    let max_value = deltas.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    if max_value == 0.0 {
        return Err(NormalizeError::Degenerate);
    }

    Ok(FeatureVector(
        deltas.iter().map(|v| (v / max_value) as f32).collect(),
    ))
}

/// Like [`try_normalize`], but falls back to the all-zero vector (the
/// untouched deltas) for degenerate input.
pub fn normalize(landmarks: &PixelLandmarks) -> FeatureVector {
    match try_normalize(landmarks) {
        Ok(features) => features,
        Err(_) => {
            debug!(
                "degenerate landmarks ({} points at one position), using zero features",
                landmarks.len()
            );
            FeatureVector(vec![0.0; landmarks.len() * 2])
        }
    }
}

fn origin_deltas(landmarks: &PixelLandmarks) -> Vec<f64> {
    let Some(&base) = landmarks.points().first() else {
        return Vec::new();
    };
    landmarks
        .points()
        .iter()
        .flat_map(|p| {
            [
                f64::from(p.x) - f64::from(base.x),
                f64::from(p.y) - f64::from(base.y),
            ]
        })
        .collect()
}

/// Per-hand normalization output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedHand {
    pub pixels: PixelLandmarks,
    pub features: FeatureVector,
    /// `true` when the degenerate fallback produced `features`.
    pub degenerate: bool,
}

/// Landmark normalizer bound to a fixed parameter set.
#[derive(Clone, Debug, Default)]
pub struct LandmarkNormalizer {
    params: NormalizerParams,
}

impl LandmarkNormalizer {
    pub fn new(params: NormalizerParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &NormalizerParams {
        &self.params
    }

    pub fn to_pixel_landmarks(
        &self,
        hand: &Hand,
        width: u32,
        height: u32,
    ) -> Result<PixelLandmarks, NormalizeError> {
        to_pixel_landmarks(hand.keypoints(), width, height, self.params.pixel_clamp)
    }

    /// Run both normalization stages for one hand in an image of the given size.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self, hand)))]
    pub fn normalize_hand(
        &self,
        hand: &Hand,
        width: u32,
        height: u32,
    ) -> Result<NormalizedHand, NormalizeError> {
        let pixels = self.to_pixel_landmarks(hand, width, height)?;
        let (features, degenerate) = match try_normalize(&pixels) {
            Ok(features) => (features, false),
            Err(NormalizeError::Degenerate) => (normalize(&pixels), true),
            Err(err) => return Err(err),
        };
        Ok(NormalizedHand {
            pixels,
            features,
            degenerate,
        })
    }
}
