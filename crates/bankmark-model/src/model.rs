//! The capability interface trained models implement, and the serde form
//! of `model.json` that dispatches to a concrete family.

use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;
use crate::linear::LogisticRegression;
use crate::trees::GradientBoostedTrees;

/// What the pipeline needs from a trained model. Nothing else about the
/// family leaks past this trait.
///
/// Implementations are immutable after load and shared read-only across
/// concurrent requests, hence `Send + Sync`.
pub trait Model: std::fmt::Debug + Send + Sync {
    /// Short family name for logs and inspection output.
    fn kind(&self) -> &'static str;

    /// Width of the feature vector the model was trained on.
    fn n_features(&self) -> usize;

    /// Positive-class probability for one encoded vector.
    ///
    /// Callers guarantee `features.len() == self.n_features()`; the
    /// inference engine checks it before reaching here.
    fn predict_proba(&self, features: &[f64]) -> f64;

    /// Trained global importances, one score per schema position, when the
    /// family records them. `None` is a capability gap, not an error.
    fn feature_importances(&self) -> Option<&[f64]>;
}

/// Logistic link shared by both families.
pub(crate) fn sigmoid(raw: f64) -> f64 {
    1.0 / (1.0 + (-raw).exp())
}

/// Wire form of `model.json`. The `family` tag picks the concrete type, so
/// new families slot in without touching the loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ModelArtifact {
    GradientBoosting(GradientBoostedTrees),
    LogisticRegression(LogisticRegression),
}

impl ModelArtifact {
    /// Validates family invariants and boxes into the pipeline's handle.
    pub fn into_model(self) -> Result<Box<dyn Model>, ArtifactError> {
        match self {
            ModelArtifact::GradientBoosting(model) => {
                model.validate()?;
                Ok(Box::new(model))
            }
            ModelArtifact::LogisticRegression(model) => {
                model.validate()?;
                Ok(Box::new(model))
            }
        }
    }
}
