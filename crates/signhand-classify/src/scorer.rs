//! The inference seam: anything that maps feature vectors to label scores.

use signhand_core::FeatureVector;
use std::sync::Arc;

/// Errors produced by a [`Scorer`] while running inference.
#[derive(thiserror::Error, Debug)]
pub enum ScorerError {
    #[error("inference failed: {0}")]
    Inference(String),
    #[cfg(feature = "onnx")]
    #[error(transparent)]
    Tract(#[from] tract_onnx::prelude::TractError),
}

/// A loaded classifier model.
///
/// `predict` maps a batch of feature vectors to one score row per input,
/// each positionally aligned with [`crate::Label::ALL`]. Implementations are
/// shared read-only across callers, so they must tolerate concurrent calls.
pub trait Scorer: Send + Sync {
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<Vec<f32>>, ScorerError>;
}

impl<S: Scorer + ?Sized> Scorer for &S {
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<Vec<f32>>, ScorerError> {
        (**self).predict(batch)
    }
}

impl<S: Scorer + ?Sized> Scorer for Box<S> {
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<Vec<f32>>, ScorerError> {
        (**self).predict(batch)
    }
}

impl<S: Scorer + ?Sized> Scorer for Arc<S> {
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<Vec<f32>>, ScorerError> {
        (**self).predict(batch)
    }
}
