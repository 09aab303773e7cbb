//! JSON configuration and report helpers for sign recognition.

use crate::classify::Prediction;
use crate::core::{FeatureVector, NormalizerParams, PixelClamp, PixelLandmarks};
use crate::detector::PrecomputedDetector;
use crate::recognize::{Recognition, SetupError};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[cfg(feature = "onnx")]
use crate::classify::OnnxScorer;
#[cfg(feature = "onnx")]
use crate::recognize::Recognizer;

#[derive(thiserror::Error, Debug)]
pub enum SignhandIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn default_max_hands() -> Option<usize> {
    Some(1)
}

/// Configuration for one recognition run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizeConfig {
    pub image_path: String,
    /// Landmarks produced by an external hand tracker, see [`crate::LandmarkFile`].
    pub landmarks_path: String,
    /// ONNX export of the sign classifier.
    pub model_path: String,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub pixel_clamp: PixelClamp,
    /// `null` keeps every detected hand.
    #[serde(default = "default_max_hands")]
    pub max_hands: Option<usize>,
}

impl RecognizeConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SignhandIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SignhandIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("signhand_report.json"))
    }

    pub fn normalizer_params(&self) -> NormalizerParams {
        NormalizerParams {
            pixel_clamp: self.pixel_clamp,
        }
    }

    /// Load the hand detector named by the config.
    pub fn build_detector(&self) -> Result<PrecomputedDetector, SetupError> {
        let detector = PrecomputedDetector::load_json(&self.landmarks_path)
            .map_err(|err| SetupError::DetectorUnavailable(Box::new(err)))?;
        Ok(detector.with_max_hands(self.max_hands))
    }

    /// Load the classifier model named by the config.
    #[cfg(feature = "onnx")]
    pub fn build_scorer(&self) -> Result<OnnxScorer, SetupError> {
        OnnxScorer::load(&self.model_path)
            .map_err(|err| SetupError::ClassifierUnavailable(Box::new(err)))
    }

    /// Build the full pipeline. The detector is loaded before the classifier.
    #[cfg(feature = "onnx")]
    pub fn build_recognizer(
        &self,
    ) -> Result<Recognizer<PrecomputedDetector, OnnxScorer>, SetupError> {
        let detector = self.build_detector()?;
        let scorer = self.build_scorer()?;
        Ok(Recognizer::new(detector, scorer, self.normalizer_params()))
    }
}

/// Result for one detected hand, in detector order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandReport {
    pub index: usize,
    #[serde(default)]
    pub pixels: Option<PixelLandmarks>,
    #[serde(default)]
    pub features: Option<FeatureVector>,
    #[serde(default)]
    pub degenerate: bool,
    #[serde(default)]
    pub prediction: Option<Prediction>,
    /// Winning score in percent, rounded to two decimals.
    #[serde(default)]
    pub confidence_percent: Option<f32>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizeReport {
    pub image_path: String,
    #[serde(default)]
    pub config_path: Option<String>,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub no_hand_detected: bool,
    #[serde(default)]
    pub hands: Vec<HandReport>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RecognizeReport {
    /// Build an empty report for one image.
    pub fn new(cfg: &RecognizeConfig, config_path: Option<&Path>, width: u32, height: u32) -> Self {
        Self {
            image_path: cfg.image_path.clone(),
            config_path: config_path.map(|p| p.to_string_lossy().into_owned()),
            width,
            height,
            no_hand_detected: false,
            hands: Vec::new(),
            error: None,
        }
    }

    /// Populate report fields from a finished recognition.
    pub fn set_recognition(&mut self, recognition: &Recognition) {
        self.no_hand_detected = recognition.is_no_hand();
        self.hands = recognition
            .outcomes()
            .iter()
            .enumerate()
            .map(|(index, outcome)| match outcome {
                Ok(hand) => HandReport {
                    index,
                    pixels: Some(hand.pixels.clone()),
                    features: Some(hand.features.clone()),
                    degenerate: hand.degenerate,
                    prediction: Some(hand.prediction),
                    confidence_percent: Some(hand.prediction.confidence_rounded()),
                    error: None,
                },
                Err(err) => HandReport {
                    index,
                    pixels: None,
                    features: None,
                    degenerate: false,
                    prediction: None,
                    confidence_percent: None,
                    error: Some(err.to_string()),
                },
            })
            .collect();
        self.error = None;
    }

    /// Record an error that aborted the whole image.
    pub fn set_error(&mut self, err: impl std::fmt::Display) {
        self.error = Some(err.to_string());
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SignhandIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SignhandIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config() -> RecognizeConfig {
        serde_json::from_str(
            r#"{"image_path": "hand.jpg", "landmarks_path": "hands.json", "model_path": "m.onnx"}"#,
        )
        .expect("config")
    }

    #[test]
    fn config_defaults_follow_single_hand_upper_clamp() {
        let cfg = minimal_config();
        assert_eq!(cfg.max_hands, Some(1));
        assert_eq!(cfg.pixel_clamp, PixelClamp::UpperOnly);
        assert_eq!(cfg.output_path(), PathBuf::from("signhand_report.json"));

        let unlimited: RecognizeConfig = serde_json::from_str(
            r#"{"image_path": "a.png", "landmarks_path": "h.json", "model_path": "m.onnx",
                "max_hands": null, "pixel_clamp": "both", "output_path": "out.json"}"#,
        )
        .expect("config");
        assert_eq!(unlimited.max_hands, None);
        assert_eq!(unlimited.normalizer_params().pixel_clamp, PixelClamp::Both);
        assert_eq!(unlimited.output_path(), PathBuf::from("out.json"));
    }

    #[test]
    fn missing_landmarks_make_the_detector_unavailable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut cfg = minimal_config();
        cfg.landmarks_path = dir.path().join("absent.json").to_string_lossy().into_owned();
        let err = cfg.build_detector().unwrap_err();
        assert!(matches!(err, SetupError::DetectorUnavailable(_)));
        assert!(err.to_string().starts_with("hand detector unavailable"));
    }

    #[test]
    fn report_marks_no_hand() {
        let cfg = minimal_config();
        let mut report = RecognizeReport::new(&cfg, None, 64, 48);
        report.set_error("stale");
        report.set_recognition(&Recognition::NoHandDetected);
        assert!(report.no_hand_detected);
        assert!(report.hands.is_empty());
        assert!(report.error.is_none());
    }
}
