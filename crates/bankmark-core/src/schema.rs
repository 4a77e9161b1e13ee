//! The ordered feature schema a trained model expects.
//!
//! The model sees only positions at inference time, so position `i` here
//! must be exactly the column the model saw at training time. The schema is
//! fixed when the bundle loads and never changes for the process lifetime.

use std::collections::HashMap;

use thiserror::Error;

/// Rejections when building a [`FeatureSchema`].
///
/// Both indicate a broken training export, not bad user input, so they
/// surface at bundle load and abort startup.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("feature list is empty")]
    Empty,

    #[error("duplicate feature name in schema: {0}")]
    DuplicateFeature(String),
}

/// The ordered feature names the trained model requires.
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Build a schema from feature names in training column order.
    pub fn new(names: Vec<String>) -> Result<Self, SchemaError> {
        if names.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut index = HashMap::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            if index.insert(name.clone(), position).is_some() {
                return Err(SchemaError::DuplicateFeature(name.clone()));
            }
        }

        Ok(Self { names, index })
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Feature names in schema order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The position of a feature, if it is part of the schema.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate names in schema order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|n| n.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(names: &[&str]) -> FeatureSchema {
        FeatureSchema::new(names.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn positions_follow_declaration_order() {
        let s = schema(&["age", "job", "euribor3m"]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.position("age"), Some(0));
        assert_eq!(s.position("job"), Some(1));
        assert_eq!(s.position("euribor3m"), Some(2));
        assert_eq!(s.position("duration"), None);
    }

    #[test]
    fn iteration_preserves_order() {
        let s = schema(&["b", "a", "c"]);
        let collected: Vec<&str> = s.iter().collect();
        assert_eq!(collected, vec!["b", "a", "c"]);
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = FeatureSchema::new(vec!["age".into(), "job".into(), "age".into()]).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateFeature(name) if name == "age"));
    }

    #[test]
    fn rejects_empty_list() {
        let err = FeatureSchema::new(vec![]).unwrap_err();
        assert!(matches!(err, SchemaError::Empty));
    }

    #[test]
    fn contains_matches_position() {
        let s = schema(&["month", "poutcome"]);
        assert!(s.contains("month"));
        assert!(!s.contains("day_of_week"));
    }
}
