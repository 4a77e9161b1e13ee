//! Request-side data carried through the prediction pipeline.
//!
//! A [`RawRecord`] is one prediction request: feature name → raw value,
//! where categorical features arrive as text and continuous features as
//! numbers. Alignment turns it into an [`EncodedVector`] with one `f64`
//! slot per schema entry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single raw input value: text for categorical features, a number for
/// continuous ones.
///
/// Untagged so a plain JSON request object (`{"age": 30, "job": "admin."}`)
/// deserializes directly without a wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// The value as a label string, when it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            RawValue::Number(_) => None,
        }
    }

    /// The value as a number: numeric values directly, text values via
    /// parsing. CLI `key=value` input arrives as text, so `"4.8"` counts.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Number(n as f64)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

/// One prediction request: feature name → raw value.
///
/// Built per request and treated as immutable once assembled. May name an
/// arbitrary subset or superset of the schema's features; the aligner
/// reconciles the difference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    values: HashMap<String, RawValue>,
}

impl RawRecord {
    /// An empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a request from a JSON object of name → value.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Set one field, replacing any earlier value for the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.set(name, value);
        self
    }

    /// The raw value supplied for a feature, if any.
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.values.get(name)
    }

    /// Whether the request names this feature at all.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// The feature names this request supplies (unordered).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<HashMap<String, RawValue>> for RawRecord {
    fn from(values: HashMap<String, RawValue>) -> Self {
        Self { values }
    }
}

/// The numeric vector a model consumes: one `f64` per schema entry, in
/// schema order.
///
/// Categorical slots hold a trained code or the unseen sentinel `-1.0`;
/// continuous slots hold the supplied number or the lenient fill `0.0`.
/// The trained model has no names at inference time, only positions, so
/// this ordering is the contract the whole pipeline hangs on.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedVector {
    values: Vec<f64>,
}

impl EncodedVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The slots in schema order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The slot at a schema position.
    pub fn get(&self, position: usize) -> Option<f64> {
        self.values.get(position).copied()
    }
}

impl From<Vec<f64>> for EncodedVector {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}
