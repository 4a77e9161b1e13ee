//! Command-line entry point for the bankmark predictor.
//!
//! Loads a model bundle once, then dispatches to the prediction,
//! explanation, or inspection handlers.

mod display;
mod input;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bankmark_model::{AlignMode, InferenceEngine, ModelBundle};

/// Term-deposit subscription predictor over an exported model bundle.
#[derive(Parser, Debug)]
#[command(name = "bankmark", version, about)]
struct Cli {
    /// Bundle directory holding model.json, features.json and encoders.json.
    #[arg(long, env = "BANKMARK_BUNDLE")]
    bundle: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score one client record.
    Predict(PredictArgs),
    /// Rank the model's most influential features.
    Explain(ExplainArgs),
    /// Show what the loaded bundle contains.
    Inspect(InspectArgs),
}

#[derive(clap::Args, Debug)]
struct PredictArgs {
    /// JSON object of feature values; `-` reads stdin.
    #[arg(long)]
    input: Option<String>,

    /// Set one feature, e.g. `--set job=admin.`. Repeatable; overrides
    /// values from --input.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Reject missing, extra, and non-numeric fields instead of coercing.
    #[arg(long)]
    strict: bool,

    /// Emit the prediction as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args, Debug)]
struct ExplainArgs {
    /// Number of features to show.
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Emit the ranking as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args, Debug)]
struct InspectArgs {
    /// Emit the bundle summary as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    tracing::info!("bankmark v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let bundle = ModelBundle::load(&cli.bundle)
        .with_context(|| format!("loading model bundle from {}", cli.bundle.display()))?;

    match cli.command {
        Commands::Predict(args) => predict(&bundle, args),
        Commands::Explain(args) => explain(&bundle, args),
        Commands::Inspect(args) => inspect(&bundle, args),
    }
}

fn predict(bundle: &ModelBundle, args: PredictArgs) -> anyhow::Result<()> {
    let record = input::read_record(args.input.as_deref(), &args.set)?;
    let mode = if args.strict {
        AlignMode::Strict
    } else {
        AlignMode::Lenient
    };

    let (vector, report) = bundle.align(&record, mode)?;
    let prediction = InferenceEngine::new(bundle.model()).predict(&vector)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
    } else {
        display::print_prediction(&prediction, &report);
    }
    Ok(())
}

fn explain(bundle: &ModelBundle, args: ExplainArgs) -> anyhow::Result<()> {
    let top = bundle.top_features(args.top);
    if args.json {
        println!("{}", serde_json::to_string_pretty(top)?);
        return Ok(());
    }
    if top.is_empty() {
        println!(
            "the {} model records no feature importances; nothing to explain",
            bundle.model().kind()
        );
        return Ok(());
    }
    display::print_importance(top);
    Ok(())
}

fn inspect(bundle: &ModelBundle, args: InspectArgs) -> anyhow::Result<()> {
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&display::bundle_summary(bundle))?
        );
        return Ok(());
    }
    display::print_bundle(bundle);
    Ok(())
}
