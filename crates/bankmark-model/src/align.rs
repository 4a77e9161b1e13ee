//! Schema alignment: raw request to full-width encoded vector.
//!
//! For every schema feature, in schema order: categorical labels go through
//! their trained encoder, numeric slots coerce to `f64`, anything the
//! request omits fills with [`FILL_VALUE`], and request fields outside the
//! schema are dropped. The output length always equals the schema length.
//! The model knows only positions, so that equality is the invariant the
//! whole pipeline hangs on.

use bankmark_core::{EncodedVector, FeatureSchema, RawRecord};
use tracing::debug;

use crate::encoder::{EncoderTable, UNSEEN_CODE};
use crate::error::PredictError;

/// Value written into a slot the request left empty.
pub const FILL_VALUE: f64 = 0.0;

/// How alignment treats disagreements between the request and the schema.
///
/// Unseen categorical labels are not an alignment concern: the encoder's
/// sentinel applies in both modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlignMode {
    /// Missing features fill with [`FILL_VALUE`], extra features drop
    /// silently, and unparseable text in a numeric slot also fills. This is
    /// the interactive default: a partial request still predicts.
    #[default]
    Lenient,
    /// Missing, extra, and non-numeric fields each fail the request with an
    /// error naming the offending feature.
    Strict,
}

/// What alignment did beyond plain slot filling, for callers that want to
/// tell the user about it. Lenient mode never warns on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignReport {
    /// Schema features whose slot received [`FILL_VALUE`], either because
    /// the request omitted them or supplied unparseable text.
    pub filled: Vec<String>,
    /// Request fields outside the schema, dropped from the vector. Sorted.
    pub dropped: Vec<String>,
    /// Categorical features whose label fell outside the trained
    /// vocabulary and encoded as the sentinel.
    pub unseen: Vec<String>,
}

impl AlignReport {
    pub fn is_clean(&self) -> bool {
        self.filled.is_empty() && self.dropped.is_empty() && self.unseen.is_empty()
    }
}

/// Turns raw records into vectors the model can score.
pub struct FeatureAligner<'a> {
    schema: &'a FeatureSchema,
    encoders: &'a EncoderTable,
    mode: AlignMode,
}

impl<'a> FeatureAligner<'a> {
    pub fn new(schema: &'a FeatureSchema, encoders: &'a EncoderTable) -> Self {
        Self::with_mode(schema, encoders, AlignMode::default())
    }

    pub fn with_mode(
        schema: &'a FeatureSchema,
        encoders: &'a EncoderTable,
        mode: AlignMode,
    ) -> Self {
        Self {
            schema,
            encoders,
            mode,
        }
    }

    pub fn mode(&self) -> AlignMode {
        self.mode
    }

    /// Aligns a request into a full-width vector.
    pub fn align(&self, record: &RawRecord) -> Result<EncodedVector, PredictError> {
        Ok(self.align_report(record)?.0)
    }

    /// Aligns a request and reports what happened to each slot.
    pub fn align_report(
        &self,
        record: &RawRecord,
    ) -> Result<(EncodedVector, AlignReport), PredictError> {
        let strict = self.mode == AlignMode::Strict;
        let mut slots = Vec::with_capacity(self.schema.len());
        let mut report = AlignReport::default();

        for name in self.schema.iter() {
            let Some(value) = record.get(name) else {
                if strict {
                    return Err(PredictError::MissingFeature {
                        feature: name.to_string(),
                    });
                }
                report.filled.push(name.to_string());
                slots.push(FILL_VALUE);
                continue;
            };

            match self.encoders.encode(name, value) {
                Some(code) => {
                    if code == UNSEEN_CODE {
                        debug!(feature = name, "label outside trained vocabulary");
                        report.unseen.push(name.to_string());
                    }
                    slots.push(code as f64);
                }
                None => match value.as_number() {
                    Some(number) => slots.push(number),
                    None => {
                        if strict {
                            return Err(PredictError::NotNumeric {
                                feature: name.to_string(),
                                value: value.as_text().unwrap_or_default().to_string(),
                            });
                        }
                        debug!(feature = name, "unparseable numeric slot, filling");
                        report.filled.push(name.to_string());
                        slots.push(FILL_VALUE);
                    }
                },
            }
        }

        let mut dropped: Vec<String> = record
            .names()
            .filter(|name| !self.schema.contains(name))
            .map(str::to_string)
            .collect();
        dropped.sort();
        if strict {
            if let Some(feature) = dropped.into_iter().next() {
                return Err(PredictError::UnexpectedFeature { feature });
            }
        } else {
            report.dropped = dropped;
        }

        debug_assert_eq!(slots.len(), self.schema.len());
        Ok((EncodedVector::new(slots), report))
    }
}
