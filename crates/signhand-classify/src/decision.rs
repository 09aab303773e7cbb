//! Turning a classifier's score distribution into a label and a confidence.

use crate::argmax::argmax;
use crate::label::{Label, LABEL_COUNT};
use crate::scorer::{Scorer, ScorerError};
use log::debug;
use serde::{Deserialize, Serialize};
use signhand_core::{FeatureVector, FEATURE_LEN};
use std::fmt;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors returned by the decision unit.
#[derive(thiserror::Error, Debug)]
pub enum ClassifyError {
    #[error("feature vector has {got} components, classifier expects {expected}")]
    FeatureLength { expected: usize, got: usize },
    /// The scorer's output does not line up with the label set.
    #[error("classifier contract violation: {got} scores for a label set of {expected}")]
    ContractViolation { expected: usize, got: usize },
    #[error("classifier returned {got} score rows for a batch of {expected}")]
    BatchSize { expected: usize, got: usize },
    #[error("classifier returned non-finite score {value} at index {index}")]
    NonFiniteScore { index: usize, value: f32 },
    #[error(transparent)]
    Scorer(#[from] ScorerError),
}

/// A resolved classification for one hand.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Label,
    /// Winning score scaled to percent. This unrounded value is the one to
    /// compare against; rounding is for display only.
    pub confidence: f32,
}

impl Prediction {
    /// Confidence rounded to two decimals.
    pub fn confidence_rounded(&self) -> f32 {
        (self.confidence * 100.0).round() / 100.0
    }

    /// Confidence formatted with two decimals, without the percent sign.
    pub fn confidence_display(&self) -> String {
        format!("{:.2}", self.confidence)
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}%)", self.label, self.confidence)
    }
}

/// Resolve a score distribution aligned with [`Label::ALL`].
///
/// The winner is the arg-max, ties going to the lowest index. A distribution
/// of any length other than [`LABEL_COUNT`] is a contract violation and is
/// never truncated or padded.
pub fn decide(distribution: &[f32]) -> Result<Prediction, ClassifyError> {
    if distribution.len() != LABEL_COUNT {
        return Err(ClassifyError::ContractViolation {
            expected: LABEL_COUNT,
            got: distribution.len(),
        });
    }
    if let Some((index, &value)) = distribution
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite())
    {
        return Err(ClassifyError::NonFiniteScore { index, value });
    }

    let winner = argmax(distribution).and_then(|i| Label::from_index(i).map(|l| (i, l)));
    let Some((index, label)) = winner else {
        return Err(ClassifyError::ContractViolation {
            expected: LABEL_COUNT,
            got: distribution.len(),
        });
    };

    Ok(Prediction {
        label,
        confidence: distribution[index] * 100.0,
    })
}

/// Decision unit over an injected [`Scorer`].
#[derive(Clone, Debug)]
pub struct LabelClassifier<S> {
    scorer: S,
}

impl<S: Scorer> LabelClassifier<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    #[inline]
    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Score one feature vector as a single-row batch and resolve the result.
    ///
    /// Deterministic for a fixed scorer: repeated calls on the same vector
    /// give the same prediction.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
    pub fn classify(&self, features: &FeatureVector) -> Result<Prediction, ClassifyError> {
        if features.len() != FEATURE_LEN {
            return Err(ClassifyError::FeatureLength {
                expected: FEATURE_LEN,
                got: features.len(),
            });
        }

        let mut rows = self.scorer.predict(std::slice::from_ref(features))?;
        if rows.len() != 1 {
            return Err(ClassifyError::BatchSize {
                expected: 1,
                got: rows.len(),
            });
        }
        let distribution = rows.swap_remove(0);

        let prediction = decide(&distribution)?;
        debug!("classified hand as {prediction}");
        Ok(prediction)
    }
}
