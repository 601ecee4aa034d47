//! Cross-platform comparison of per-benchmark performance counters.
//!
//! Counter records captured on two platforms are loaded per benchmark,
//! enriched with derived efficiency metrics, joined into comparison records
//! with explicit ratio semantics, and rolled up into summary statistics.
//!
//! ```no_run
//! use counter_compare::{Aggregator, Catalog, DirectorySource};
//!
//! let catalog = Catalog::from_path("config.json")?;
//! let source = DirectorySource::new("results");
//! let aggregation = Aggregator::new(&catalog, &source).aggregate(&catalog.benchmark_names());
//! println!("{}/{} complete", aggregation.success_count, aggregation.total_count);
//! # Ok::<(), counter_compare::ConfigError>(())
//! ```

pub mod aggregate;
pub mod catalog;
pub mod compare;
pub mod counters;
pub mod derived;
pub mod error;
pub mod loader;
pub mod metadata;
pub mod output;
pub mod ratio;
pub mod schema;
pub mod source;

pub use aggregate::{Aggregation, Aggregator, SummaryStatistics};
pub use catalog::{Catalog, Category, PlatformSpec};
pub use compare::{compare, Completeness, ComparisonRecord, MetricComparison};
pub use counters::{BaseMetric, CounterRecord};
pub use derived::{derive, DerivedMetric, DerivedMetrics, Metric};
pub use error::{ConfigError, OutputError};
pub use loader::{LoadDiagnostic, LoadedCounters, Loader};
pub use ratio::Ratio;
pub use source::{CounterSource, DirectorySource, MemorySource, SourceData};
