//! Prediction entry points over a loaded model.
//!
//! The engine trusts the aligner for slot contents and enforces exactly one
//! precondition: vector width. A wrong width means the schema and the model
//! artifact disagree, so the request fails loudly instead of being padded.

use bankmark_core::{EncodedVector, Prediction};

use crate::error::PredictError;
use crate::model::Model;

/// Thin inference wrapper around one trained model.
pub struct InferenceEngine<'a> {
    model: &'a dyn Model,
}

impl<'a> InferenceEngine<'a> {
    pub fn new(model: &'a dyn Model) -> Self {
        Self { model }
    }

    /// Positive-class probability for an aligned vector.
    pub fn predict_proba(&self, vector: &EncodedVector) -> Result<f64, PredictError> {
        let expected = self.model.n_features();
        if vector.len() != expected {
            return Err(PredictError::SchemaMismatch {
                expected,
                actual: vector.len(),
            });
        }
        Ok(self.model.predict_proba(vector.values()))
    }

    /// Binary label plus the probability it was thresholded from.
    pub fn predict(&self, vector: &EncodedVector) -> Result<Prediction, PredictError> {
        Ok(Prediction::from_probability(self.predict_proba(vector)?))
    }
}
