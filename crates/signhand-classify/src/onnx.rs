//! ONNX classifier models, run on the CPU with `tract`.

use crate::scorer::{Scorer, ScorerError};
use log::info;
use signhand_core::{FeatureVector, FEATURE_LEN};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tract_onnx::prelude::{
    tvec, DatumExt, Framework, Graph, InferenceModelExt, SimplePlan, TValue, Tensor,
    TractError, TypedFact, TypedOp,
};

type Plan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Errors raised while loading a classifier model.
#[derive(thiserror::Error, Debug)]
pub enum LoadModelError {
    #[error("classifier model must have an `.onnx` extension: {}", .0.display())]
    NotOnnx(PathBuf),
    #[error(transparent)]
    Tract(#[from] TractError),
}

/// A classifier exported to ONNX, taking a `[1, 42]` float input and
/// returning one score per label.
///
/// The optimized plan is immutable after loading; clones share it, and
/// concurrent `predict` calls are safe.
#[derive(Clone)]
pub struct OnnxScorer {
    plan: Arc<Plan>,
    source: Option<PathBuf>,
}

impl OnnxScorer {
    /// Load and optimize a model from an `.onnx` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadModelError> {
        let path = path.as_ref();
        match path.extension() {
            Some(ext) if ext == "onnx" => {}
            _ => return Err(LoadModelError::NotOnnx(path.to_path_buf())),
        }

        let graph = tract_onnx::onnx().model_for_path(path)?;
        let plan = Self::optimize(graph)?;
        info!("loaded classifier model {}", path.display());
        Ok(Self {
            plan: Arc::new(plan),
            source: Some(path.to_path_buf()),
        })
    }

    /// Load and optimize a model from in-memory ONNX bytes.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, LoadModelError> {
        let graph = tract_onnx::onnx().model_for_read(&mut &*raw)?;
        let plan = Self::optimize(graph)?;
        Ok(Self {
            plan: Arc::new(plan),
            source: None,
        })
    }

    fn optimize(graph: tract_onnx::prelude::InferenceModel) -> Result<Plan, TractError> {
        graph
            .with_input_fact(0, f32::fact([1, FEATURE_LEN]).into())?
            .into_optimized()?
            .into_runnable()
    }

    /// File the model was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn predict_one(&self, features: &FeatureVector) -> Result<Vec<f32>, ScorerError> {
        let input = Tensor::from_shape(&[1, features.len()], features.as_slice())?;
        let outputs = self.plan.run(tvec!(TValue::from_const(Arc::new(input))))?;
        let scores = outputs
            .first()
            .ok_or_else(|| ScorerError::Inference("model produced no outputs".into()))?
            .to_array_view::<f32>()?;
        Ok(scores.iter().copied().collect())
    }
}

impl std::fmt::Debug for OnnxScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxScorer")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl Scorer for OnnxScorer {
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<Vec<f32>>, ScorerError> {
        batch.iter().map(|row| self.predict_one(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Label, LabelClassifier, LABEL_COUNT};
    use approx::assert_relative_eq;
    use std::io::Write;

    /// `features [1, 42] -> MatMul -> Softmax -> scores [1, 35]`, with a single
    /// weight of 10 linking feature 2 to label `V`.
    const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/sign_classifier.onnx");

    fn one_hot(index: usize) -> FeatureVector {
        let mut v = vec![0.0; FEATURE_LEN];
        v[index] = 1.0;
        FeatureVector::new(v)
    }

    #[test]
    fn fixture_model_scores_each_row() {
        let scorer = OnnxScorer::load(FIXTURE).expect("fixture model");
        assert_eq!(scorer.source(), Some(Path::new(FIXTURE)));

        let rows = scorer
            .predict(&[one_hot(2), FeatureVector::new(vec![0.0; FEATURE_LEN])])
            .expect("inference");
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.len(), LABEL_COUNT);
            assert_relative_eq!(row.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
        }
        assert_relative_eq!(rows[0][30], 0.998_459, epsilon = 1e-5);
        assert!(rows[1]
            .iter()
            .all(|&p| (p - 1.0 / LABEL_COUNT as f32).abs() < 1e-6));
    }

    #[test]
    fn fixture_model_drives_the_decision_unit() {
        let raw = include_bytes!("../tests/data/sign_classifier.onnx");
        let clf = LabelClassifier::new(OnnxScorer::from_bytes(raw).expect("fixture model"));

        let p = clf.classify(&one_hot(2)).expect("prediction");
        assert_eq!(p.label, Label::V);
        assert_eq!(p.confidence_display(), "99.85");

        // Uniform scores tie everywhere; the lowest index wins.
        let p = clf.classify(&one_hot(5)).expect("prediction");
        assert_eq!(p.label, Label::One);
    }

    #[test]
    fn rejects_non_onnx_paths() {
        let err = OnnxScorer::load("model.h5").unwrap_err();
        assert!(matches!(err, LoadModelError::NotOnnx(_)));
    }

    #[test]
    fn missing_model_fails_to_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = OnnxScorer::load(dir.path().join("absent.onnx")).unwrap_err();
        assert!(matches!(err, LoadModelError::Tract(_)));
    }

    #[test]
    fn garbage_model_fails_to_load() {
        let mut file = tempfile::Builder::new()
            .suffix(".onnx")
            .tempfile()
            .expect("tempfile");
        file.write_all(b"definitely not protobuf").expect("write");
        assert!(OnnxScorer::load(file.path()).is_err());
        assert!(OnnxScorer::from_bytes(b"\x00\x01\x02").is_err());
    }
}
