//! Metric catalog: benchmarks by category, base metrics, platforms.
//!
//! Loaded once per run from a JSON document and read-only afterwards.
//! Every validation failure here is fatal for the run.

use crate::counters::BaseMetric;
use crate::derived::{DerivedMetric, Metric};
use crate::error::ConfigError;
use crate::source::is_plain_name;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// =============================================================================
// Document shape
// =============================================================================

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    platforms: PlatformPair,
    benchmarks: BenchmarkGroups,
    metrics: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct PlatformPair {
    a: PlatformSpec,
    b: PlatformSpec,
}

impl Default for PlatformPair {
    fn default() -> Self {
        Self {
            a: PlatformSpec::named("prismchrono", "PrismChrono"),
            b: PlatformSpec::named("x86", "x86"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct BenchmarkGroups {
    #[serde(default)]
    standard: Vec<Entry>,
    #[serde(default)]
    ternary_specific: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    name: String,
    #[serde(default)]
    description: String,
}

// =============================================================================
// Public types
// =============================================================================

/// One of the two compared platforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSpec {
    /// Short identifier, used as the column prefix and the raw results
    /// subdirectory name.
    pub name: String,
    /// Human-readable label for logs and the console summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Overrides `<results root>/raw/<name>` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_dir: Option<PathBuf>,
}

impl PlatformSpec {
    pub fn named(name: &str, display_name: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: Some(display_name.to_string()),
            results_dir: None,
        }
    }

    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// Benchmark grouping used for per-category averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Standard,
    TernarySpecific,
    /// Not listed in any configured category.
    Unknown,
}

impl Category {
    /// Categories that get their own averages.
    pub const GROUPED: [Category; 2] = [Category::Standard, Category::TernarySpecific];

    pub fn name(self) -> &'static str {
        match self {
            Category::Standard => "standard",
            Category::TernarySpecific => "ternary_specific",
            Category::Unknown => "unknown",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Standard => "Standard",
            Category::TernarySpecific => "Ternary specific",
            Category::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BenchmarkEntry {
    name: String,
    category: Category,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDefinition {
    pub metric: BaseMetric,
    pub description: String,
}

/// The validated catalog for one run.
#[derive(Debug, Clone)]
pub struct Catalog {
    platform_a: PlatformSpec,
    platform_b: PlatformSpec,
    benchmarks: Vec<BenchmarkEntry>,
    metrics: Vec<MetricDefinition>,
}

impl Catalog {
    /// Reads and validates the catalog document at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;
        let catalog = Self::from_json_str(&contents)?;
        info!(
            path = %path.display(),
            benchmarks = catalog.benchmarks.len(),
            metrics = catalog.metrics.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Parses and validates a catalog document.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let doc: CatalogDocument = serde_json::from_str(contents)?;
        Self::from_document(doc)
    }

    fn from_document(doc: CatalogDocument) -> Result<Self, ConfigError> {
        for platform in [&doc.platforms.a, &doc.platforms.b] {
            validate_platform_name(&platform.name)?;
        }
        if doc.platforms.a.name == doc.platforms.b.name {
            return Err(ConfigError::SamePlatform(doc.platforms.a.name));
        }

        let mut seen = HashSet::new();
        let mut benchmarks = Vec::new();
        for (category, entries) in [
            (Category::Standard, doc.benchmarks.standard),
            (Category::TernarySpecific, doc.benchmarks.ternary_specific),
        ] {
            for entry in entries {
                if !is_plain_name(&entry.name) {
                    return Err(ConfigError::InvalidBenchmarkName(entry.name));
                }
                if !seen.insert(entry.name.clone()) {
                    return Err(ConfigError::DuplicateBenchmark(entry.name));
                }
                debug!(
                    benchmark = %entry.name,
                    %category,
                    description = %entry.description,
                    "catalog benchmark"
                );
                benchmarks.push(BenchmarkEntry {
                    name: entry.name,
                    category,
                });
            }
        }
        if benchmarks.is_empty() {
            return Err(ConfigError::NoBenchmarks);
        }

        let mut metrics: Vec<MetricDefinition> = Vec::with_capacity(doc.metrics.len());
        for entry in doc.metrics {
            let metric: BaseMetric = entry
                .name
                .parse()
                .map_err(ConfigError::UnknownMetric)?;
            if metrics.iter().any(|d| d.metric == metric) {
                return Err(ConfigError::DuplicateMetric(entry.name));
            }
            metrics.push(MetricDefinition {
                metric,
                description: entry.description,
            });
        }
        if metrics.is_empty() {
            return Err(ConfigError::NoMetrics);
        }

        Ok(Self {
            platform_a: doc.platforms.a,
            platform_b: doc.platforms.b,
            benchmarks,
            metrics,
        })
    }

    pub fn platform_a(&self) -> &PlatformSpec {
        &self.platform_a
    }

    pub fn platform_b(&self) -> &PlatformSpec {
        &self.platform_b
    }

    /// Benchmark names in run order: standard first, then ternary-specific.
    pub fn benchmark_names(&self) -> Vec<String> {
        self.benchmarks.iter().map(|b| b.name.clone()).collect()
    }

    pub fn category_of(&self, benchmark: &str) -> Category {
        self.benchmarks
            .iter()
            .find(|b| b.name == benchmark)
            .map(|b| b.category)
            .unwrap_or(Category::Unknown)
    }

    pub fn count_in(&self, category: Category) -> usize {
        self.benchmarks.iter().filter(|b| b.category == category).count()
    }

    pub fn metric_definitions(&self) -> &[MetricDefinition] {
        &self.metrics
    }

    /// Requested base metrics in catalog order.
    pub fn base_metrics(&self) -> impl Iterator<Item = BaseMetric> + '_ {
        self.metrics.iter().map(|d| d.metric)
    }

    pub fn derived_metrics(&self) -> &'static [DerivedMetric] {
        &DerivedMetric::ALL
    }

    /// Column order: base metrics as configured, then the derived metrics.
    pub fn metrics(&self) -> Vec<Metric> {
        self.base_metrics()
            .map(Metric::Base)
            .chain(self.derived_metrics().iter().copied().map(Metric::Derived))
            .collect()
    }

    /// Configured description, falling back to the metric name.
    pub fn describe(&self, metric: Metric) -> &str {
        match metric {
            Metric::Base(base) => self
                .metrics
                .iter()
                .find(|d| d.metric == base && !d.description.is_empty())
                .map(|d| d.description.as_str())
                .unwrap_or(base.name()),
            Metric::Derived(derived) => derived.description(),
        }
    }
}

fn validate_platform_name(name: &str) -> Result<(), ConfigError> {
    let usable = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if usable && name != "ratio" {
        Ok(())
    } else {
        Err(ConfigError::InvalidPlatformName(name.to_string()))
    }
}
