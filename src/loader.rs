//! Raw counter loading with graceful degradation.
//!
//! The loader never fails. A missing, unreadable or malformed source yields
//! a zero-filled record with `success == false`; suspicious but parseable
//! data yields the record with `success == true`. Both cases attach
//! diagnostics that are also logged.

use crate::catalog::{Catalog, PlatformSpec};
use crate::counters::{BaseMetric, CounterRecord};
use crate::source::{CounterSource, SourceData};
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

/// Something noteworthy about one loaded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadDiagnostic {
    /// No source exists for the pair.
    SourceMissing { location: String },
    /// The source exists but could not be read.
    SourceUnreadable { location: String, reason: String },
    /// The source was read but is not a valid counter document.
    Malformed { location: String, reason: String },
    /// Requested counters absent from the document; they default to zero.
    MissingFields(Vec<BaseMetric>),
    /// Every requested counter is zero.
    AllZero,
    /// Some requested counters are zero.
    PartialZero(Vec<BaseMetric>),
}

impl LoadDiagnostic {
    /// Whether this diagnostic made the load unsuccessful.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            LoadDiagnostic::SourceMissing { .. }
                | LoadDiagnostic::SourceUnreadable { .. }
                | LoadDiagnostic::Malformed { .. }
        )
    }
}

impl fmt::Display for LoadDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadDiagnostic::SourceMissing { location } => {
                write!(f, "results file not found: {}", location)
            }
            LoadDiagnostic::SourceUnreadable { location, reason } => {
                write!(f, "cannot read {}: {}", location, reason)
            }
            LoadDiagnostic::Malformed { location, reason } => {
                write!(f, "invalid counter document {}: {}", location, reason)
            }
            LoadDiagnostic::MissingFields(fields) => {
                write!(f, "counters absent, defaulted to 0: {}", join(fields))
            }
            LoadDiagnostic::AllZero => f.write_str("all counters are zero"),
            LoadDiagnostic::PartialZero(fields) => {
                write!(f, "some counters are zero: {}", join(fields))
            }
        }
    }
}

fn join(metrics: &[BaseMetric]) -> String {
    metrics
        .iter()
        .map(|m| m.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A counter record together with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCounters {
    pub record: CounterRecord,
    pub success: bool,
    pub diagnostics: Vec<LoadDiagnostic>,
}

impl LoadedCounters {
    fn failed(diagnostic: LoadDiagnostic) -> Self {
        Self {
            record: CounterRecord::zeroed(),
            success: false,
            diagnostics: vec![diagnostic],
        }
    }

    /// Counters that were requested but absent from the source.
    pub fn missing_fields(&self) -> &[BaseMetric] {
        self.diagnostics
            .iter()
            .find_map(|d| match d {
                LoadDiagnostic::MissingFields(fields) => Some(fields.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }
}

/// Loads counter records for the catalog's requested metrics.
pub struct Loader<'a, S> {
    catalog: &'a Catalog,
    source: S,
}

impl<'a, S: CounterSource> Loader<'a, S> {
    pub fn new(catalog: &'a Catalog, source: S) -> Self {
        Self { catalog, source }
    }

    pub fn load(&self, platform: &PlatformSpec, benchmark: &str) -> LoadedCounters {
        let loaded = match self.source.fetch(platform, benchmark) {
            SourceData::Missing { location } => {
                LoadedCounters::failed(LoadDiagnostic::SourceMissing { location })
            }
            SourceData::Unreadable { location, reason } => {
                LoadedCounters::failed(LoadDiagnostic::SourceUnreadable { location, reason })
            }
            SourceData::Contents { location, text } => {
                match parse_counters(&text, self.catalog.base_metrics()) {
                    Ok((record, missing)) => self.inspect(record, missing),
                    Err(reason) => {
                        LoadedCounters::failed(LoadDiagnostic::Malformed { location, reason })
                    }
                }
            }
        };

        for diagnostic in &loaded.diagnostics {
            warn!(platform = platform.label(), benchmark, "{}", diagnostic);
        }
        debug!(
            platform = platform.label(),
            benchmark,
            success = loaded.success,
            "loaded counters"
        );
        loaded
    }

    fn inspect(&self, record: CounterRecord, missing: Vec<BaseMetric>) -> LoadedCounters {
        let mut diagnostics = Vec::new();
        if !missing.is_empty() {
            diagnostics.push(LoadDiagnostic::MissingFields(missing));
        }

        let zero: Vec<BaseMetric> = self
            .catalog
            .base_metrics()
            .filter(|m| record.get(*m) == 0.0)
            .collect();
        let requested = self.catalog.metric_definitions().len();
        if zero.len() == requested {
            diagnostics.push(LoadDiagnostic::AllZero);
        } else if !zero.is_empty() {
            diagnostics.push(LoadDiagnostic::PartialZero(zero));
        }

        LoadedCounters {
            record,
            success: true,
            diagnostics,
        }
    }
}

/// Extracts the requested counters from a raw JSON document.
///
/// Returns the record and the requested counters the document lacks.
/// Unrequested fields are ignored. A present field must be a finite,
/// non-negative number.
pub fn parse_counters(
    text: &str,
    requested: impl IntoIterator<Item = BaseMetric>,
) -> Result<(CounterRecord, Vec<BaseMetric>), String> {
    let value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    let object = value
        .as_object()
        .ok_or_else(|| "expected a JSON object".to_string())?;

    let mut record = CounterRecord::zeroed();
    let mut missing = Vec::new();
    for metric in requested {
        match object.get(metric.name()) {
            None => missing.push(metric),
            Some(field) => {
                let number = field
                    .as_f64()
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .ok_or_else(|| {
                        format!("field '{}' is not a non-negative number: {}", metric, field)
                    })?;
                record.set(metric, number);
            }
        }
    }
    Ok((record, missing))
}
