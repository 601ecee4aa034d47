//! Output document types and the flattened record layout.
//!
//! Plotting and reporting tools read these files, so column names and
//! order are part of the contract: `benchmark`, `category`, then for every
//! metric `<a>_<metric>`, `<b>_<metric>`, `ratio_<metric>`. The combined
//! JSON document is a bare array of record objects; run metadata goes to a
//! separate artifact.

use crate::catalog::{Catalog, PlatformSpec};
use crate::compare::ComparisonRecord;
use crate::ratio::Ratio;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Version of the record layout, recorded in the run metadata.
pub const SCHEMA_VERSION: u32 = 1;

/// Metadata captured at the start of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Layout version of the records written alongside this metadata.
    pub schema_version: u32,
    /// RFC 3339 timestamp of the run start.
    pub timestamp: String,
    /// Short git commit hash (absent outside a git checkout).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_commit: Option<String>,
    /// Git branch name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    /// Whether the working tree had uncommitted changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_dirty: Option<bool>,
    /// Version of this tool.
    pub tool_version: String,
    /// The platform whose values are the ratio numerators.
    pub platform_a: PlatformSpec,
    /// The platform whose values are the ratio denominators.
    pub platform_b: PlatformSpec,
}

/// Column names of the tabular form.
pub fn columns(catalog: &Catalog) -> Vec<String> {
    let a = &catalog.platform_a().name;
    let b = &catalog.platform_b().name;
    let mut columns = vec!["benchmark".to_string(), "category".to_string()];
    for metric in catalog.metrics() {
        columns.push(format!("{}_{}", a, metric));
        columns.push(format!("{}_{}", b, metric));
        columns.push(format!("ratio_{}", metric));
    }
    columns
}

/// One record as a JSON object, keys in column order.
///
/// Adds `platform` and the two `<platform>_success` flags after the
/// category, which the tabular form leaves out.
pub fn record_object(catalog: &Catalog, record: &ComparisonRecord) -> Map<String, Value> {
    let a = &catalog.platform_a().name;
    let b = &catalog.platform_b().name;

    let mut object = Map::new();
    object.insert("benchmark".into(), Value::from(record.benchmark.clone()));
    object.insert("platform".into(), Value::from("both"));
    object.insert("category".into(), Value::from(record.category.name()));
    object.insert(format!("{}_success", a), Value::from(record.platform_a_success));
    object.insert(format!("{}_success", b), Value::from(record.platform_b_success));
    for m in &record.metrics {
        object.insert(format!("{}_{}", a, m.metric), number(m.platform_a));
        object.insert(format!("{}_{}", b, m.metric), number(m.platform_b));
        object.insert(format!("ratio_{}", m.metric), ratio_value(m.ratio));
    }
    object
}

/// One record as a CSV row matching [`columns`].
///
/// Cells are taken from [`record_object`], so both forms share one value
/// encoding.
pub fn record_row(catalog: &Catalog, record: &ComparisonRecord) -> Vec<String> {
    let object = record_object(catalog, record);
    columns(catalog)
        .iter()
        .map(|column| object.get(column).map(cell).unwrap_or_default())
        .collect()
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Counters are non-negative; integral ones are written without a `.0`.
fn number(v: f64) -> Value {
    if v >= 0.0 && v.fract() == 0.0 && v < u64::MAX as f64 {
        Value::from(v as u64)
    } else {
        Value::from(v)
    }
}

/// `Undefined` is the string `"inf"` (JSON has no infinity) and
/// `ZeroOverZero` is the integer `0`.
fn ratio_value(ratio: Ratio) -> Value {
    match ratio {
        Ratio::Defined(v) => Value::from(v),
        Ratio::Undefined => Value::from("inf"),
        Ratio::ZeroOverZero => Value::from(0),
    }
}
