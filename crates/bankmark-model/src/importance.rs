//! Global feature-importance ranking for explainability.

use std::cmp::Ordering;

use bankmark_core::{FeatureImportance, FeatureSchema};

use crate::model::Model;

/// Pairs the model's trained importances with schema names and sorts them
/// descending by score. The sort is stable, so equal scores keep schema
/// order and repeated calls on the same artifact agree entry for entry.
///
/// Empty when the family records no importances. Explainability is a
/// capability some model types simply do not have.
pub fn rank_features(model: &dyn Model, schema: &FeatureSchema) -> Vec<FeatureImportance> {
    let Some(scores) = model.feature_importances() else {
        return Vec::new();
    };

    let mut ranking: Vec<FeatureImportance> = schema
        .iter()
        .zip(scores)
        .map(|(feature, &score)| FeatureImportance::new(feature, score))
        .collect();
    ranking.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
    });
    ranking
}

/// At most `k` top-ranked features.
pub fn top_k(model: &dyn Model, schema: &FeatureSchema, k: usize) -> Vec<FeatureImportance> {
    let mut ranking = rank_features(model, schema);
    ranking.truncate(k);
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct ScoredModel {
        scores: Option<Vec<f64>>,
    }

    impl Model for ScoredModel {
        fn kind(&self) -> &'static str {
            "scored"
        }

        fn n_features(&self) -> usize {
            self.scores.as_ref().map_or(0, Vec::len)
        }

        fn predict_proba(&self, _features: &[f64]) -> f64 {
            0.5
        }

        fn feature_importances(&self) -> Option<&[f64]> {
            self.scores.as_deref()
        }
    }

    fn schema(names: &[&str]) -> FeatureSchema {
        FeatureSchema::new(names.iter().map(|name| name.to_string()).collect()).unwrap()
    }

    #[test]
    fn ranking_is_descending() {
        let model = ScoredModel {
            scores: Some(vec![0.1, 0.6, 0.3]),
        };
        let schema = schema(&["age", "euribor3m", "campaign"]);
        let ranking = rank_features(&model, &schema);
        let names: Vec<&str> = ranking.iter().map(|e| e.feature.as_str()).collect();
        assert_eq!(names, ["euribor3m", "campaign", "age"]);
        assert!(ranking.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn ties_keep_schema_order() {
        let model = ScoredModel {
            scores: Some(vec![0.2, 0.5, 0.2, 0.5]),
        };
        let schema = schema(&["a", "b", "c", "d"]);
        let names: Vec<String> = rank_features(&model, &schema)
            .into_iter()
            .map(|e| e.feature)
            .collect();
        assert_eq!(names, ["b", "d", "a", "c"]);
    }

    #[test]
    fn missing_capability_yields_empty_ranking() {
        let model = ScoredModel { scores: None };
        let schema = schema(&["age"]);
        assert!(rank_features(&model, &schema).is_empty());
        assert!(top_k(&model, &schema, 10).is_empty());
    }

    #[test]
    fn top_k_truncates_and_clamps() {
        let model = ScoredModel {
            scores: Some(vec![0.4, 0.1, 0.9]),
        };
        let schema = schema(&["a", "b", "c"]);
        let top = top_k(&model, &schema, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].feature, "c");
        assert_eq!(top_k(&model, &schema, 10).len(), 3);
        assert!(top_k(&model, &schema, 0).is_empty());
    }

    #[test]
    fn repeated_ranking_is_identical() {
        let model = ScoredModel {
            scores: Some(vec![0.3, 0.3, 0.3]),
        };
        let schema = schema(&["x", "y", "z"]);
        assert_eq!(
            rank_features(&model, &schema),
            rank_features(&model, &schema)
        );
    }
}
