//! Label set and decision unit for hand-sign classification.
//!
//! A [`Scorer`] maps normalized hand features to one score per [`Label`];
//! [`LabelClassifier`] resolves those scores into a [`Prediction`]. The
//! `onnx` feature adds [`OnnxScorer`], which runs an exported classifier
//! with `tract`.

mod argmax;
mod decision;
mod label;
#[cfg(feature = "onnx")]
mod onnx;
mod scorer;

pub use argmax::argmax;
pub use decision::{decide, ClassifyError, LabelClassifier, Prediction};
pub use label::{Label, ParseLabelError, LABEL_COUNT};
#[cfg(feature = "onnx")]
pub use onnx::{LoadModelError, OnnxScorer};
pub use scorer::{Scorer, ScorerError};
