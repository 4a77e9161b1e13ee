//! Card-style terminal output for predictions, rankings, and bundle
//! contents.

use bankmark_core::{FeatureImportance, Prediction};
use bankmark_model::{AlignReport, ModelBundle};
use serde_json::json;

const BAR_WIDTH: usize = 40;
const MAX_VOCAB_ITEMS: usize = 12;

/// Print one scored record as a vertical card, with alignment notes when
/// the request needed coercion.
pub fn print_prediction(prediction: &Prediction, report: &AlignReport) {
    println!("=== prediction ===");
    let verdict = if prediction.subscribed() {
        "yes, likely to subscribe"
    } else {
        "no, unlikely to subscribe"
    };
    println!("  {:<26} {}", "term deposit", verdict);
    println!(
        "  {:<26} {:.1}%",
        "probability",
        prediction.probability * 100.0
    );
    println!("  {:<26} {}", "label", prediction.label);

    if !report.is_clean() {
        println!();
    }
    if !report.unseen.is_empty() {
        println!(
            "  note: outside the trained vocabulary: {}",
            report.unseen.join(", ")
        );
    }
    if !report.filled.is_empty() {
        println!("  note: defaulted to 0: {}", report.filled.join(", "));
    }
    if !report.dropped.is_empty() {
        println!(
            "  note: ignored unknown fields: {}",
            report.dropped.join(", ")
        );
    }
}

/// Print a descending importance ranking as a horizontal text bar chart.
pub fn print_importance(entries: &[FeatureImportance]) {
    println!("=== feature importance ===");
    let max = entries.iter().map(|e| e.score).fold(0.0_f64, f64::max);
    for entry in entries {
        let width = if max > 0.0 {
            ((entry.score / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let bar = "#".repeat(width);
        println!(
            "  {:<26} {:<pad$} {:.4}",
            entry.feature,
            bar,
            entry.score,
            pad = BAR_WIDTH
        );
    }
}

/// Print the loaded bundle's schema and encoders as a card.
pub fn print_bundle(bundle: &ModelBundle) {
    let model = bundle.model();
    println!("=== model bundle ===");
    println!("  {:<26} {}", "model family", model.kind());
    println!("  {:<26} {}", "features", bundle.schema().len());
    println!("  {:<26} {}", "categorical", bundle.encoders().len());
    println!(
        "  {:<26} {}",
        "importances",
        if model.feature_importances().is_some() {
            "yes"
        } else {
            "no"
        }
    );
    println!();

    println!("Features");
    for name in bundle.schema().iter() {
        match bundle.encoders().known_labels(name) {
            Some(labels) => {
                let shown: Vec<&str> = labels
                    .iter()
                    .take(MAX_VOCAB_ITEMS)
                    .map(String::as_str)
                    .collect();
                let mut line = shown.join(", ");
                if labels.len() > MAX_VOCAB_ITEMS {
                    line.push_str(&format!(", ... and {} more", labels.len() - MAX_VOCAB_ITEMS));
                }
                println!("  {:<26} {}", name, line);
            }
            None => println!("  {:<26} (numeric)", name),
        }
    }
}

/// JSON summary of the bundle for `inspect --json`.
pub fn bundle_summary(bundle: &ModelBundle) -> serde_json::Value {
    let encoders = bundle.encoders();
    let features: Vec<serde_json::Value> = bundle
        .schema()
        .iter()
        .map(|name| match encoders.known_labels(name) {
            Some(labels) => json!({
                "name": name,
                "kind": "categorical",
                "labels": labels,
            }),
            None => json!({
                "name": name,
                "kind": "numeric",
            }),
        })
        .collect();

    json!({
        "model": bundle.model().kind(),
        "features": features,
        "importances": bundle.model().feature_importances().is_some(),
    })
}
