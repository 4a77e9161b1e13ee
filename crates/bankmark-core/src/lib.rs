pub mod prediction;
pub mod record;
pub mod schema;

pub use prediction::{DECISION_THRESHOLD, FeatureImportance, Prediction};
pub use record::{EncodedVector, RawRecord, RawValue};
pub use schema::{FeatureSchema, SchemaError};
