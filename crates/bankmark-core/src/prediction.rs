//! Prediction and explainability result types.

use serde::{Deserialize, Serialize};

/// Probability cutoff at and above which the positive class is predicted.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Outcome of one prediction request.
///
/// Derived per request, never stored. `label` is `1` exactly when
/// `probability >= DECISION_THRESHOLD`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// `1` = the client is predicted to subscribe, `0` = not.
    pub label: u8,
    /// Model-estimated probability of subscription.
    pub probability: f64,
}

impl Prediction {
    /// Derive the label from a probability using [`DECISION_THRESHOLD`].
    pub fn from_probability(probability: f64) -> Self {
        let label = if probability >= DECISION_THRESHOLD { 1 } else { 0 };
        Self { label, probability }
    }

    /// Whether the positive class (subscription) was predicted.
    pub fn subscribed(&self) -> bool {
        self.label == 1
    }
}

/// One entry of an importance ranking: a feature and its global score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub score: f64,
}

impl FeatureImportance {
    pub fn new(feature: impl Into<String>, score: f64) -> Self {
        Self {
            feature: feature.into(),
            score,
        }
    }
}
