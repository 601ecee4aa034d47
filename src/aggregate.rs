//! Runs the load → derive → compare pipeline over a benchmark set and
//! rolls the results into summary statistics.

use crate::catalog::{Catalog, Category};
use crate::compare::{compare, Completeness, ComparisonRecord};
use crate::derived::{derive, Metric};
use crate::loader::Loader;
use crate::ratio::mean_ratio;
use crate::source::CounterSource;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{info, warn};

/// Average ratio per metric, in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricAverages(pub Vec<(Metric, f64)>);

impl MetricAverages {
    pub fn get(&self, metric: impl Into<Metric>) -> Option<f64> {
        let metric = metric.into();
        self.0.iter().find(|(m, _)| *m == metric).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.0.iter().copied()
    }
}

impl Serialize for MetricAverages {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (metric, value) in &self.0 {
            map.serialize_entry(metric.name(), value)?;
        }
        map.end()
    }
}

/// Per-category averages for the grouped categories.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryAverages(pub Vec<(Category, MetricAverages)>);

impl CategoryAverages {
    pub fn get(&self, category: Category) -> Option<&MetricAverages> {
        self.0.iter().find(|(c, _)| *c == category).map(|(_, a)| a)
    }
}

impl Serialize for CategoryAverages {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, averages) in &self.0 {
            map.serialize_entry(category.name(), averages)?;
        }
        map.end()
    }
}

/// Global and per-category roll-up of a run.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SummaryStatistics {
    pub total_benchmarks: usize,
    pub standard_benchmarks: usize,
    pub ternary_specific_benchmarks: usize,
    pub success_count: usize,
    pub avg_ratios: MetricAverages,
    pub category_avg_ratios: CategoryAverages,
}

/// Result of a full run.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// One record per input benchmark, in input order.
    pub records: Vec<ComparisonRecord>,
    pub summary: SummaryStatistics,
    /// Benchmarks where both platforms loaded.
    pub success_count: usize,
    pub total_count: usize,
}

impl Aggregation {
    pub fn all_complete(&self) -> bool {
        self.success_count == self.total_count
    }
}

pub struct Aggregator<'a, S> {
    catalog: &'a Catalog,
    loader: Loader<'a, S>,
}

impl<'a, S: CounterSource> Aggregator<'a, S> {
    pub fn new(catalog: &'a Catalog, source: S) -> Self {
        Self {
            catalog,
            loader: Loader::new(catalog, source),
        }
    }

    /// Loads, derives and compares a single benchmark.
    pub fn compare_one(&self, benchmark: &str) -> ComparisonRecord {
        let a = self.loader.load(self.catalog.platform_a(), benchmark);
        let b = self.loader.load(self.catalog.platform_b(), benchmark);
        let derived_a = derive(&a.record);
        let derived_b = derive(&b.record);
        compare(self.catalog, benchmark, &a, &b, &derived_a, &derived_b)
    }

    /// Processes `benchmarks` in order.
    pub fn aggregate<B: AsRef<str>>(&self, benchmarks: &[B]) -> Aggregation {
        let mut records = Vec::with_capacity(benchmarks.len());
        for benchmark in benchmarks {
            let benchmark = benchmark.as_ref();
            info!(benchmark, "processing benchmark");
            let record = self.compare_one(benchmark);
            match record.completeness() {
                Completeness::Complete => {}
                Completeness::Partial => warn!(benchmark, "only one platform has results"),
                Completeness::Failed => warn!(benchmark, "no platform has results"),
            }
            records.push(record);
        }

        let summary = summarize(self.catalog, &records);
        Aggregation {
            success_count: summary.success_count,
            total_count: records.len(),
            summary,
            records,
        }
    }
}

/// Computes summary statistics from a finished record list.
pub fn summarize(catalog: &Catalog, records: &[ComparisonRecord]) -> SummaryStatistics {
    let metrics = catalog.metrics();
    let averages = |category: Option<Category>| {
        MetricAverages(
            metrics
                .iter()
                .map(|&metric| {
                    let ratios = records
                        .iter()
                        .filter(|r| category.map_or(true, |c| r.category == c))
                        .filter_map(|r| r.ratio(metric));
                    (metric, mean_ratio(ratios))
                })
                .collect(),
        )
    };

    let count = |category: Category| records.iter().filter(|r| r.category == category).count();

    SummaryStatistics {
        total_benchmarks: records.len(),
        standard_benchmarks: count(Category::Standard),
        ternary_specific_benchmarks: count(Category::TernarySpecific),
        success_count: records
            .iter()
            .filter(|r| r.completeness() == Completeness::Complete)
            .count(),
        avg_ratios: averages(None),
        category_avg_ratios: CategoryAverages(
            Category::GROUPED
                .into_iter()
                .map(|c| (c, averages(Some(c))))
                .collect(),
        ),
    }
}
