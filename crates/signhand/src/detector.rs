//! Hand detectors: the source of per-hand keypoints for an image.

use serde::{Deserialize, Serialize};
use signhand_core::{Hand, RgbImageView};
use std::{fs, path::Path};

/// Errors produced by a [`HandDetector`].
#[derive(thiserror::Error, Debug)]
pub enum DetectorError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("hand detection failed: {0}")]
    Failed(String),
}

/// Finds hands in an image.
///
/// Returns zero or more hands, each with 21 keypoints in image-relative
/// coordinates. An empty list means no hand was found and is not an error.
/// Detectors are loaded once and shared read-only, so they must tolerate
/// concurrent calls.
pub trait HandDetector: Send + Sync {
    fn detect(&self, image: &RgbImageView<'_>) -> Result<Vec<Hand>, DetectorError>;
}

impl<D: HandDetector + ?Sized> HandDetector for &D {
    fn detect(&self, image: &RgbImageView<'_>) -> Result<Vec<Hand>, DetectorError> {
        (**self).detect(image)
    }
}

impl<D: HandDetector + ?Sized> HandDetector for Box<D> {
    fn detect(&self, image: &RgbImageView<'_>) -> Result<Vec<Hand>, DetectorError> {
        (**self).detect(image)
    }
}

/// On-disk form of precomputed landmarks: `{"hands": [[{"x":..,"y":..}, ...], ...]}`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LandmarkFile {
    #[serde(default)]
    pub hands: Vec<Hand>,
}

impl LandmarkFile {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DetectorError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DetectorError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Detector that replays landmarks produced by an external hand tracker.
///
/// The same hands are reported for every image, capped at `max_hands`.
#[derive(Clone, Debug, Default)]
pub struct PrecomputedDetector {
    hands: Vec<Hand>,
    max_hands: Option<usize>,
}

impl PrecomputedDetector {
    pub fn new(hands: Vec<Hand>) -> Self {
        Self {
            hands,
            max_hands: None,
        }
    }

    /// Load hands from a [`LandmarkFile`] JSON document.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DetectorError> {
        let file = LandmarkFile::load_json(path)?;
        Ok(Self::new(file.hands))
    }

    /// Report at most `max_hands` hands, keeping detector order.
    pub fn with_max_hands(mut self, max_hands: Option<usize>) -> Self {
        self.max_hands = max_hands;
        self
    }

    #[inline]
    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }
}

impl HandDetector for PrecomputedDetector {
    fn detect(&self, _image: &RgbImageView<'_>) -> Result<Vec<Hand>, DetectorError> {
        let take = self.max_hands.unwrap_or(self.hands.len());
        Ok(self.hands.iter().take(take).cloned().collect())
    }
}
