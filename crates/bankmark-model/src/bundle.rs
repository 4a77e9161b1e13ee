//! The process-wide model bundle: schema, encoders, and trained model.
//!
//! Three artifacts load together from a bundle directory, mirroring the
//! training export. Loading is all-or-nothing: any missing or inconsistent
//! blob fails the whole load, and a process without a loaded bundle must
//! not answer predictions. A `ModelBundle` value only exists after a
//! successful load, and it never changes afterwards, so it can be shared
//! across threads without locking.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use bankmark_core::{
    EncodedVector, FeatureImportance, FeatureSchema, Prediction, RawRecord,
};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::align::{AlignMode, AlignReport, FeatureAligner};
use crate::encoder::EncoderTable;
use crate::engine::InferenceEngine;
use crate::error::{ArtifactError, PredictError};
use crate::importance::rank_features;
use crate::model::{Model, ModelArtifact};

pub const MODEL_FILE: &str = "model.json";
pub const FEATURES_FILE: &str = "features.json";
pub const ENCODERS_FILE: &str = "encoders.json";

#[derive(Debug)]
pub struct ModelBundle {
    schema: FeatureSchema,
    encoders: EncoderTable,
    model: Box<dyn Model>,
    /// Computed once on first request; the inputs never change after load.
    ranking: OnceLock<Vec<FeatureImportance>>,
}

impl ModelBundle {
    /// Loads the artifact triple from a bundle directory.
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let artifact: ModelArtifact = read_json(&dir.join(MODEL_FILE))?;
        let names: Vec<String> = read_json(&dir.join(FEATURES_FILE))?;
        let classes: HashMap<String, Vec<String>> = read_json(&dir.join(ENCODERS_FILE))?;

        let schema = FeatureSchema::new(names)?;
        let encoders = EncoderTable::from_classes(classes)?;
        let model = artifact.into_model()?;
        Self::from_parts(schema, encoders, model)
    }

    /// Assembles a bundle from already-validated parts and checks that the
    /// three artifacts agree with each other.
    pub fn from_parts(
        schema: FeatureSchema,
        encoders: EncoderTable,
        model: Box<dyn Model>,
    ) -> Result<Self, ArtifactError> {
        if model.n_features() != schema.len() {
            return Err(ArtifactError::WidthMismatch {
                model: model.n_features(),
                schema: schema.len(),
            });
        }
        let mut categorical: Vec<String> = encoders.features().map(str::to_string).collect();
        // Sorted so a broken artifact always reports the same feature first.
        categorical.sort_unstable();
        for feature in categorical {
            if !schema.contains(&feature) {
                return Err(ArtifactError::EncoderWithoutFeature { feature });
            }
        }

        info!(
            model = model.kind(),
            features = schema.len(),
            categorical = encoders.len(),
            "loaded model bundle"
        );
        Ok(Self {
            schema,
            encoders,
            model,
            ranking: OnceLock::new(),
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn encoders(&self) -> &EncoderTable {
        &self.encoders
    }

    pub fn model(&self) -> &dyn Model {
        self.model.as_ref()
    }

    /// Aligns a raw record against the schema without predicting.
    pub fn align(
        &self,
        record: &RawRecord,
        mode: AlignMode,
    ) -> Result<(EncodedVector, AlignReport), PredictError> {
        FeatureAligner::with_mode(&self.schema, &self.encoders, mode).align_report(record)
    }

    /// Lenient end-to-end prediction: encode, align, score, threshold.
    pub fn predict(&self, record: &RawRecord) -> Result<Prediction, PredictError> {
        self.predict_with_mode(record, AlignMode::Lenient)
    }

    pub fn predict_with_mode(
        &self,
        record: &RawRecord,
        mode: AlignMode,
    ) -> Result<Prediction, PredictError> {
        let (vector, _) = self.align(record, mode)?;
        let prediction = InferenceEngine::new(self.model.as_ref()).predict(&vector)?;
        debug!(
            label = prediction.label,
            probability = prediction.probability,
            "scored record"
        );
        Ok(prediction)
    }

    /// Positive-class probability without the thresholded label.
    pub fn predict_proba(&self, record: &RawRecord) -> Result<f64, PredictError> {
        let (vector, _) = self.align(record, AlignMode::Lenient)?;
        InferenceEngine::new(self.model.as_ref()).predict_proba(&vector)
    }

    /// Full importance ranking, descending, memoized for the bundle's
    /// lifetime. Empty when the model family records no importances.
    pub fn importance_ranking(&self) -> &[FeatureImportance] {
        self.ranking
            .get_or_init(|| rank_features(self.model.as_ref(), &self.schema))
    }

    /// At most `k` top-ranked features.
    pub fn top_features(&self, k: usize) -> &[FeatureImportance] {
        let ranking = self.importance_ranking();
        &ranking[..k.min(ranking.len())]
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::LogisticRegression;
    use crate::model::sigmoid;
    use crate::trees::{GradientBoostedTrees, Tree, TreeNode};

    fn schema(names: &[&str]) -> FeatureSchema {
        FeatureSchema::new(names.iter().map(|name| name.to_string()).collect()).unwrap()
    }

    fn job_encoders() -> EncoderTable {
        let mut map = HashMap::new();
        map.insert(
            "job".to_string(),
            vec![
                "admin.".to_string(),
                "retired".to_string(),
                "services".to_string(),
            ],
        );
        EncoderTable::from_classes(map).unwrap()
    }

    fn tree_bundle() -> ModelBundle {
        let tree = Tree::new(vec![
            TreeNode::Split {
                feature: 0,
                threshold: 40.0,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { value: 0.8 },
            TreeNode::Leaf { value: -0.6 },
        ]);
        let model =
            GradientBoostedTrees::new(3, -0.5, 1.0, vec![tree], Some(vec![0.6, 0.1, 0.3]));
        ModelBundle::from_parts(
            schema(&["age", "job", "campaign"]),
            job_encoders(),
            Box::new(model),
        )
        .unwrap()
    }

    #[test]
    fn predicts_through_the_whole_pipeline() {
        let bundle = tree_bundle();
        let record = RawRecord::new()
            .with("age", 30.0)
            .with("job", "admin.")
            .with("campaign", 1.0);
        let prediction = bundle.predict(&record).unwrap();
        // age 30 routes left: raw = -0.5 + 0.8 = 0.3
        assert!((prediction.probability - sigmoid(0.3)).abs() < 1e-12);
        assert_eq!(prediction.label, 1);
    }

    #[test]
    fn repeated_predictions_are_identical() {
        let bundle = tree_bundle();
        let record = RawRecord::new()
            .with("age", 52.0)
            .with("job", "services")
            .with("campaign", 4.0);
        let first = bundle.predict(&record).unwrap();
        let second = bundle.predict(&record).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unseen_job_still_predicts() {
        let bundle = tree_bundle();
        let record = RawRecord::new()
            .with("age", 30.0)
            .with("job", "astronaut")
            .with("campaign", 1.0);
        let (vector, report) = bundle.align(&record, AlignMode::Lenient).unwrap();
        assert_eq!(vector.values()[1], -1.0);
        assert_eq!(report.unseen, ["job"]);
        assert!(bundle.predict(&record).is_ok());
    }

    #[test]
    fn ranking_is_memoized_and_ordered() {
        let bundle = tree_bundle();
        let first = bundle.importance_ranking();
        let second = bundle.importance_ranking();
        assert!(std::ptr::eq(first.as_ptr(), second.as_ptr()));
        let names: Vec<&str> = first.iter().map(|e| e.feature.as_str()).collect();
        assert_eq!(names, ["age", "campaign", "job"]);
        assert_eq!(bundle.top_features(2).len(), 2);
        assert_eq!(bundle.top_features(10).len(), 3);
    }

    #[test]
    fn linear_bundle_has_no_ranking() {
        let bundle = ModelBundle::from_parts(
            schema(&["age", "job"]),
            job_encoders(),
            Box::new(LogisticRegression::new(vec![0.02, -0.4], -1.0)),
        )
        .unwrap();
        assert!(bundle.importance_ranking().is_empty());
        assert!(bundle.top_features(10).is_empty());
    }

    #[test]
    fn width_mismatch_fails_assembly() {
        let err = ModelBundle::from_parts(
            schema(&["age", "job"]),
            job_encoders(),
            Box::new(LogisticRegression::new(vec![0.1, 0.2, 0.3], 0.0)),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::WidthMismatch { model: 3, schema: 2 }
        ));
    }

    #[test]
    fn encoder_for_unknown_feature_fails_assembly() {
        let err = ModelBundle::from_parts(
            schema(&["age"]),
            job_encoders(),
            Box::new(LogisticRegression::new(vec![0.1], 0.0)),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::EncoderWithoutFeature { feature } if feature == "job"
        ));
    }

    #[test]
    fn loads_a_bundle_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FEATURES_FILE), r#"["age", "job"]"#).unwrap();
        fs::write(
            dir.path().join(ENCODERS_FILE),
            r#"{"job": ["admin.", "retired"]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join(MODEL_FILE),
            r#"{"family": "logistic_regression", "coefficients": [0.02, -0.4], "intercept": -1.0}"#,
        )
        .unwrap();

        let bundle = ModelBundle::load(dir.path()).unwrap();
        let record = RawRecord::new().with("age", 50.0).with("job", "retired");
        let proba = bundle.predict_proba(&record).unwrap();
        // margin = 0.02 * 50 - 0.4 * 1 - 1.0 = -0.4
        assert!((proba - sigmoid(-0.4)).abs() < 1e-12);
    }

    #[test]
    fn missing_artifact_fails_the_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FEATURES_FILE), r#"["age"]"#).unwrap();
        fs::write(dir.path().join(ENCODERS_FILE), r#"{}"#).unwrap();
        let err = ModelBundle::load(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Missing(path) if path.ends_with(MODEL_FILE)));
    }

    #[test]
    fn malformed_artifact_fails_the_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MODEL_FILE), "not json").unwrap();
        fs::write(dir.path().join(FEATURES_FILE), r#"["age"]"#).unwrap();
        fs::write(dir.path().join(ENCODERS_FILE), r#"{}"#).unwrap();
        let err = ModelBundle::load(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Parse { path, .. } if path.ends_with(MODEL_FILE)));
    }

    #[test]
    fn demo_bundle_loads_and_predicts() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../bundles/bank-marketing");
        let bundle = ModelBundle::load(&dir).unwrap();
        assert_eq!(bundle.schema().len(), 18);
        assert_eq!(bundle.model().kind(), "gradient_boosting");

        let record = RawRecord::new()
            .with("age", 30.0)
            .with("job", "admin.")
            .with("marital", "married")
            .with("education", "university.degree")
            .with("default", "no")
            .with("housing", "yes")
            .with("loan", "no")
            .with("contact", "cellular")
            .with("month", "may")
            .with("campaign", 1.0)
            .with("pdays", 999.0)
            .with("previous", 0.0)
            .with("poutcome", "nonexistent")
            .with("emp.var.rate", 1.1)
            .with("cons.price.idx", 93.2)
            .with("cons.conf.idx", -36.4)
            .with("euribor3m", 4.8)
            .with("nr.employed", 5191.0);

        let (vector, report) = bundle.align(&record, AlignMode::Lenient).unwrap();
        assert_eq!(vector.len(), 18);
        assert!(report.is_clean());

        let prediction = bundle.predict(&record).unwrap();
        assert!(prediction.probability > 0.0 && prediction.probability < 1.0);
        assert_eq!(prediction, bundle.predict(&record).unwrap());

        let top = bundle.top_features(10);
        assert_eq!(top.len(), 10);
        assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
