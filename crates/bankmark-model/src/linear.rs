//! Logistic-regression family: `sigmoid(w . x + b)`.
//!
//! Its training export records no per-feature importances, so this family
//! exercises the pipeline's empty-explainability path.

use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;
use crate::model::{Model, sigmoid};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// One weight per schema position.
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        if self.coefficients.is_empty() {
            return Err(ArtifactError::InvalidModel(
                "logistic regression has no coefficients".to_string(),
            ));
        }
        Ok(())
    }
}

impl Model for LogisticRegression {
    fn kind(&self) -> &'static str {
        "logistic_regression"
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_proba(&self, features: &[f64]) -> f64 {
        let margin: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(weight, value)| weight * value)
            .sum();
        sigmoid(margin + self.intercept)
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        None
    }
}
