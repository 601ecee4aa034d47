//! Error types.
//!
//! Only configuration and output failures are errors. Per-benchmark source
//! problems degrade to diagnostics on the loaded record (see
//! [`crate::loader::LoadDiagnostic`]).

use std::path::PathBuf;
use thiserror::Error;

/// Fatal problems with the catalog document. Any of these aborts the run
/// before a single benchmark is loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("configuration lists no benchmarks")]
    NoBenchmarks,

    #[error("configuration lists no metrics")]
    NoMetrics,

    #[error("unknown base metric '{0}'")]
    UnknownMetric(String),

    #[error("metric '{0}' is listed more than once")]
    DuplicateMetric(String),

    #[error("benchmark '{0}' is listed more than once")]
    DuplicateBenchmark(String),

    #[error("benchmark name '{0}' is not a plain file name")]
    InvalidBenchmarkName(String),

    #[error("both platforms are named '{0}'")]
    SamePlatform(String),

    #[error("platform name '{0}' is not usable as a column prefix")]
    InvalidPlatformName(String),
}

/// Failures while persisting run artifacts.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),
}

impl ConfigError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

impl OutputError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
