//! Request assembly from `--input` JSON and `--set` overrides.

use std::fs;
use std::io::Read;

use anyhow::{Context, bail};
use bankmark_core::{RawRecord, RawValue};

/// Builds the record to score: `--input` JSON first (a path, or `-` for
/// stdin), then `--set` overrides applied on top.
pub fn read_record(input: Option<&str>, sets: &[String]) -> anyhow::Result<RawRecord> {
    let mut record = match input {
        Some("-") => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading record from stdin")?;
            RawRecord::from_json_str(&text).context("parsing record JSON from stdin")?
        }
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading record from {path}"))?;
            RawRecord::from_json_str(&text)
                .with_context(|| format!("parsing record JSON from {path}"))?
        }
        None => RawRecord::new(),
    };

    for entry in sets {
        let (name, value) = parse_set(entry)?;
        record.set(name, value);
    }

    if record.is_empty() {
        bail!("no input: pass --input FILE ('-' for stdin) or at least one --set KEY=VALUE");
    }
    Ok(record)
}

/// Splits `KEY=VALUE`. The value becomes a number when it parses as one and
/// text otherwise, the same distinction JSON input carries natively.
fn parse_set(entry: &str) -> anyhow::Result<(String, RawValue)> {
    let Some((name, value)) = entry.split_once('=') else {
        bail!("malformed --set {entry:?}: expected KEY=VALUE");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("malformed --set {entry:?}: empty feature name");
    }
    let value = value.trim();
    let value = match value.parse::<f64>() {
        Ok(number) => RawValue::from(number),
        Err(_) => RawValue::from(value),
    };
    Ok((name.to_string(), value))
}
