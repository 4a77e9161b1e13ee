//! Label-to-code tables for categorical features.
//!
//! Codes come from the training run: the artifact stores each feature's
//! label array in code order, and codes are never regenerated at inference
//! time. A label outside the trained vocabulary encodes as [`UNSEEN_CODE`]
//! instead of failing, so live input the campaign data never contained
//! still produces a prediction.

use std::collections::HashMap;

use bankmark_core::RawValue;

use crate::error::ArtifactError;

/// Sentinel code for a label outside the trained vocabulary. The trained
/// codes are all non-negative, so the sentinel can never collide with them.
pub const UNSEEN_CODE: i64 = -1;

/// One categorical feature's label/code bijection.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    /// Labels in code order: `classes[i]` encodes as `i`.
    classes: Vec<String>,
    codes: HashMap<String, i64>,
}

impl LabelEncoder {
    /// Builds an encoder from the trained label array. The array index is
    /// the code, so order must match the training export exactly.
    pub fn new(feature: &str, classes: Vec<String>) -> Result<Self, ArtifactError> {
        if classes.is_empty() {
            return Err(ArtifactError::EmptyEncoder {
                feature: feature.to_string(),
            });
        }
        let mut codes = HashMap::with_capacity(classes.len());
        for (code, label) in classes.iter().enumerate() {
            if codes.insert(label.clone(), code as i64).is_some() {
                return Err(ArtifactError::DuplicateLabel {
                    feature: feature.to_string(),
                    label: label.clone(),
                });
            }
        }
        Ok(Self { classes, codes })
    }

    /// The trained code for a label, or `None` when it is out of vocabulary.
    pub fn code(&self, label: &str) -> Option<i64> {
        self.codes.get(label).copied()
    }

    /// The trained vocabulary in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Every categorical encoder of one model bundle, keyed by feature name.
#[derive(Debug, Clone, Default)]
pub struct EncoderTable {
    encoders: HashMap<String, LabelEncoder>,
}

impl EncoderTable {
    /// Builds the table from the artifact map of feature name to label
    /// array in code order.
    pub fn from_classes(map: HashMap<String, Vec<String>>) -> Result<Self, ArtifactError> {
        let mut entries: Vec<(String, Vec<String>)> = map.into_iter().collect();
        // Sorted so a broken artifact always reports the same feature first.
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut encoders = HashMap::with_capacity(entries.len());
        for (feature, classes) in entries {
            let encoder = LabelEncoder::new(&feature, classes)?;
            encoders.insert(feature, encoder);
        }
        Ok(Self { encoders })
    }

    /// Whether a feature has a trained encoder, i.e. is categorical.
    pub fn is_categorical(&self, feature: &str) -> bool {
        self.encoders.contains_key(feature)
    }

    /// Encodes one raw value for a feature.
    ///
    /// `None` means the feature is not categorical and the value passes
    /// through to numeric handling. For a categorical feature the result is
    /// the trained code, or [`UNSEEN_CODE`] when the label falls outside the
    /// vocabulary. A numeric value in a categorical slot can never match a
    /// trained label, so it also encodes as the sentinel.
    pub fn encode(&self, feature: &str, value: &RawValue) -> Option<i64> {
        let encoder = self.encoders.get(feature)?;
        let code = match value {
            RawValue::Text(label) => encoder.code(label).unwrap_or(UNSEEN_CODE),
            RawValue::Number(_) => UNSEEN_CODE,
        };
        Some(code)
    }

    /// The trained vocabulary of a categorical feature, in code order.
    pub fn known_labels(&self, feature: &str) -> Option<&[String]> {
        self.encoders.get(feature).map(LabelEncoder::classes)
    }

    /// Names of the categorical features, in no particular order.
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.encoders.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }
}
