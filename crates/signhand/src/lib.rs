//! High-level facade crate for the `signhand-*` workspace.
//!
//! This crate provides:
//! - re-exports of the core and classifier crates
//! - the [`HandDetector`] seam and a detector that replays landmarks produced
//!   by an external hand tracker
//! - the [`Recognizer`] pipeline: detect -> normalize -> classify, per hand
//! - JSON configuration and report helpers used by the `signhand` binary
//! - (feature-gated) image loading helpers built on the `image` crate
//!
//! ## Quickstart
//!
//! ```no_run
//! use signhand::{detect, OnnxScorer, PrecomputedDetector, Recognizer};
//! use signhand::core::NormalizerParams;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let detector = PrecomputedDetector::load_json("hands.json")?.with_max_hands(Some(1));
//! let scorer = OnnxScorer::load("sign_classifier.onnx")?;
//! let recognizer = Recognizer::new(detector, scorer, NormalizerParams::default());
//!
//! let img = detect::load_rgb_image("hand.jpg")?;
//! for prediction in recognizer.recognize(&detect::rgb_view(&img))?.predictions() {
//!     println!("Predicted: {prediction}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `signhand::core`: keypoints, hands, normalizer, feature vectors, logger.
//! - `signhand::classify`: label set, scorer trait, decision unit, ONNX scorer.
//! - `signhand::detector`: hand detector trait and precomputed landmarks.
//! - `signhand::recognize`: the per-image pipeline and its outcomes.
//! - `signhand::io`: JSON config and report.
//! - `signhand::detect` (feature `image`): end-to-end helpers from image files.

pub use signhand_classify as classify;
pub use signhand_core as core;

pub mod detector;
pub mod io;
pub mod recognize;

#[cfg(feature = "image")]
pub mod detect;

pub use detector::{DetectorError, HandDetector, LandmarkFile, PrecomputedDetector};
pub use io::{HandReport, RecognizeConfig, RecognizeReport, SignhandIoError};
pub use recognize::{
    HandOutcome, HandRecognition, HandRecognizeError, Recognition, RecognizeError, Recognizer,
    SetupError,
};
pub use signhand_classify::{Label, LabelClassifier, Prediction, Scorer};

#[cfg(feature = "onnx")]
pub use signhand_classify::OnnxScorer;
