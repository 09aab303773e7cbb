//! Per-image recognition pipeline: detect -> normalize -> classify, per hand.

use crate::detector::{DetectorError, HandDetector};
use crate::classify::{ClassifyError, LabelClassifier, Prediction, Scorer};
use crate::core::{
    FeatureVector, Hand, LandmarkNormalizer, NormalizeError, NormalizerParams, PixelLandmarks,
    RgbImageView,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Startup failures: a shared resource could not be created.
///
/// These are fatal; nothing should be recognized without both resources.
#[derive(thiserror::Error, Debug)]
pub enum SetupError {
    #[error("hand detector unavailable: {0}")]
    DetectorUnavailable(#[source] BoxError),
    #[error("classifier unavailable: {0}")]
    ClassifierUnavailable(#[source] BoxError),
}

/// Failures that abort recognition of a whole image.
#[derive(thiserror::Error, Debug)]
pub enum RecognizeError {
    #[error("invalid RGB image (width={width}, height={height}, {len} bytes)")]
    InvalidImage { width: u32, height: u32, len: usize },
    #[error(transparent)]
    Detection(#[from] DetectorError),
}

/// Failures that abort recognition of a single hand.
#[derive(thiserror::Error, Debug)]
pub enum HandRecognizeError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

/// Everything computed for one successfully classified hand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandRecognition {
    pub pixels: PixelLandmarks,
    pub features: FeatureVector,
    /// Set when all landmarks coincided and the zero feature vector was used.
    pub degenerate: bool,
    pub prediction: Prediction,
}

/// Outcome of one hand, independent of the other hands in the image.
pub type HandOutcome = Result<HandRecognition, HandRecognizeError>;

/// Terminal state for one image.
#[derive(Debug)]
pub enum Recognition {
    /// The detector found no hands; nothing was classified.
    NoHandDetected,
    /// One outcome per detected hand, in detector order.
    Hands(Vec<HandOutcome>),
}

impl Recognition {
    #[inline]
    pub fn is_no_hand(&self) -> bool {
        matches!(self, Recognition::NoHandDetected)
    }

    /// Per-hand outcomes; empty for [`Recognition::NoHandDetected`].
    pub fn outcomes(&self) -> &[HandOutcome] {
        match self {
            Recognition::NoHandDetected => &[],
            Recognition::Hands(outcomes) => outcomes,
        }
    }

    /// Successful predictions, in detector order.
    pub fn predictions(&self) -> impl Iterator<Item = Prediction> + '_ {
        self.outcomes()
            .iter()
            .filter_map(|outcome| outcome.as_ref().ok().map(|hand| hand.prediction))
    }
}

/// Detector, normalizer and classifier wired together.
///
/// Build it once at startup and reuse it for every image; it holds no
/// per-image state.
pub struct Recognizer<D, S> {
    detector: D,
    normalizer: LandmarkNormalizer,
    classifier: LabelClassifier<S>,
}

impl<D: HandDetector, S: Scorer> Recognizer<D, S> {
    pub fn new(detector: D, scorer: S, params: NormalizerParams) -> Self {
        Self {
            detector,
            normalizer: LandmarkNormalizer::new(params),
            classifier: LabelClassifier::new(scorer),
        }
    }

    #[inline]
    pub fn detector(&self) -> &D {
        &self.detector
    }

    #[inline]
    pub fn normalizer(&self) -> &LandmarkNormalizer {
        &self.normalizer
    }

    #[inline]
    pub fn classifier(&self) -> &LabelClassifier<S> {
        &self.classifier
    }

    /// Detect hands in `image` and classify each of them.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(width = image.width, height = image.height))
    )]
    pub fn recognize(&self, image: &RgbImageView<'_>) -> Result<Recognition, RecognizeError> {
        if !image.is_consistent() {
            return Err(RecognizeError::InvalidImage {
                width: image.width,
                height: image.height,
                len: image.data.len(),
            });
        }

        let hands = self.detector.detect(image)?;
        info!("detected {} hand(s)", hands.len());
        Ok(self.recognize_hands(&hands, image.width, image.height))
    }

    /// Classify already-detected hands of a `width x height` image.
    pub fn recognize_hands(&self, hands: &[Hand], width: u32, height: u32) -> Recognition {
        if hands.is_empty() {
            return Recognition::NoHandDetected;
        }

        let outcomes = hands
            .iter()
            .enumerate()
            .map(|(i, hand)| {
                let outcome = self.recognize_hand(hand, width, height);
                if let Err(err) = &outcome {
                    warn!("hand {i}: {err}");
                }
                outcome
            })
            .collect();
        Recognition::Hands(outcomes)
    }

    /// Normalize and classify a single hand.
    pub fn recognize_hand(&self, hand: &Hand, width: u32, height: u32) -> HandOutcome {
        let normalized = self.normalizer.normalize_hand(hand, width, height)?;
        if normalized.degenerate {
            warn!("all hand landmarks coincide; classifying zero features");
        }
        let prediction = self.classifier.classify(&normalized.features)?;
        Ok(HandRecognition {
            pixels: normalized.pixels,
            features: normalized.features,
            degenerate: normalized.degenerate,
            prediction,
        })
    }
}
