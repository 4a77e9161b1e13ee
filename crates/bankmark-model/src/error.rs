use std::path::PathBuf;

use thiserror::Error;

use bankmark_core::SchemaError;

/// Fatal artifact problems found while loading a model bundle.
///
/// Every variant means the artifact triple is missing or internally
/// inconsistent. These abort startup; a process that fails to load a bundle
/// must not serve predictions from a partial one.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("bundle artifact not found: {0}")]
    Missing(PathBuf),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("encoder references feature {feature:?} absent from the schema")]
    EncoderWithoutFeature { feature: String },

    #[error("duplicate label {label:?} in the encoder for {feature:?}")]
    DuplicateLabel { feature: String, label: String },

    #[error("encoder for {feature:?} has no labels")]
    EmptyEncoder { feature: String },

    #[error("model expects {model} features but the schema lists {schema}")]
    WidthMismatch { model: usize, schema: usize },

    #[error("importance scores cover {scores} features but the model has {features}")]
    ImportanceLength { scores: usize, features: usize },

    #[error("invalid model artifact: {0}")]
    InvalidModel(String),
}

/// Per-request failures on the prediction path.
///
/// Unseen categorical labels are deliberately not represented here: the
/// encoder maps them to its sentinel code and the request proceeds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PredictError {
    /// The encoded vector's width disagrees with the trained model. This is
    /// artifact version skew, never a user-input problem, so it is surfaced
    /// rather than absorbed.
    #[error("feature vector has {actual} slots but the model expects {expected}")]
    SchemaMismatch { expected: usize, actual: usize },

    /// Strict alignment only: the request omits a schema feature.
    #[error("missing feature {feature:?}")]
    MissingFeature { feature: String },

    /// Strict alignment only: the request names a feature outside the schema.
    #[error("unexpected feature {feature:?}")]
    UnexpectedFeature { feature: String },

    /// Strict alignment only: a numeric slot received text that does not
    /// parse as a number.
    #[error("feature {feature:?} expects a number, got {value:?}")]
    NotNumeric { feature: String, value: String },
}
