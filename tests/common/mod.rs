//! Shared test utilities: fixture paths, catalog builders and temporary
//! results trees.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use counter_compare::{BaseMetric, Catalog, CounterRecord};
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Fixture paths
// =============================================================================

pub fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

pub fn fixture_catalog() -> Catalog {
    Catalog::from_path(data_dir().join("config.json")).expect("fixture catalog must load")
}

// =============================================================================
// Catalog builders
// =============================================================================

pub const ALL_METRICS: [&str; 6] = [
    "instruction_count",
    "code_size",
    "memory_reads",
    "memory_writes",
    "branches",
    "branches_taken",
];

/// A catalog with the default platforms and every base metric.
pub fn catalog(standard: &[&str], ternary: &[&str]) -> Catalog {
    catalog_with_metrics(standard, ternary, &ALL_METRICS)
}

pub fn catalog_with_metrics(standard: &[&str], ternary: &[&str], metrics: &[&str]) -> Catalog {
    let entries = |names: &[&str]| {
        names
            .iter()
            .map(|n| json!({"name": n, "description": format!("{} benchmark", n)}))
            .collect::<Vec<_>>()
    };
    let doc = json!({
        "benchmarks": {
            "standard": entries(standard),
            "ternary_specific": entries(ternary),
        },
        "metrics": metrics
            .iter()
            .map(|m| json!({"name": m, "description": m}))
            .collect::<Vec<_>>(),
    });
    Catalog::from_json_str(&doc.to_string()).expect("test catalog must be valid")
}

// =============================================================================
// Counter records
// =============================================================================

/// Builds a record from values in `BaseMetric::ALL` order.
pub fn record(values: [f64; 6]) -> CounterRecord {
    BaseMetric::ALL
        .into_iter()
        .zip(values)
        .fold(CounterRecord::zeroed(), |r, (m, v)| r.with(m, v))
}

// =============================================================================
// Temporary results tree
// =============================================================================

/// A temporary `<root>/raw/<platform>/<benchmark>.json` tree.
pub struct ResultsTree {
    dir: TempDir,
}

impl ResultsTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_raw(&self, platform: &str, benchmark: &str, contents: &str) -> PathBuf {
        let dir = self.root().join("raw").join(platform);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{}.json", benchmark));
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn write_record(&self, platform: &str, benchmark: &str, record: &CounterRecord) -> PathBuf {
        let mut doc = serde_json::to_value(record).unwrap();
        doc["benchmark"] = json!(benchmark);
        self.write_raw(platform, benchmark, &doc.to_string())
    }
}
