//! Model-bundle loading and the encode, align, predict pipeline.
//!
//! A bundle is three immutable artifacts exported together by a training
//! run: the feature schema, the categorical encoders, and the trained
//! model. [`ModelBundle`] loads them all-or-nothing and serves predictions
//! and importance rankings from shared read-only state.

pub mod align;
pub mod bundle;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod importance;
pub mod linear;
pub mod model;
pub mod trees;

pub use align::{AlignMode, AlignReport, FeatureAligner, FILL_VALUE};
pub use bundle::{ENCODERS_FILE, FEATURES_FILE, MODEL_FILE, ModelBundle};
pub use encoder::{EncoderTable, LabelEncoder, UNSEEN_CODE};
pub use engine::InferenceEngine;
pub use error::{ArtifactError, PredictError};
pub use importance::{rank_features, top_k};
pub use linear::LogisticRegression;
pub use model::{Model, ModelArtifact};
pub use trees::{GradientBoostedTrees, Tree, TreeNode};
