//! Joins both platforms' metrics for one benchmark.

use crate::catalog::{Catalog, Category};
use crate::derived::{DerivedMetrics, Metric};
use crate::loader::LoadedCounters;
use crate::ratio::Ratio;
use tracing::debug;

/// Both platforms' values for one metric and their ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricComparison {
    pub metric: Metric,
    pub platform_a: f64,
    pub platform_b: f64,
    pub ratio: Ratio,
}

/// How much of a benchmark's data was actually available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completeness {
    /// Both platforms loaded.
    Complete,
    /// Exactly one platform loaded.
    Partial,
    /// Neither platform loaded.
    Failed,
}

/// Per-benchmark comparison of both platforms.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRecord {
    pub benchmark: String,
    pub category: Category,
    pub platform_a_success: bool,
    pub platform_b_success: bool,
    /// Base metrics in catalog order, then derived metrics.
    pub metrics: Vec<MetricComparison>,
}

impl ComparisonRecord {
    pub fn completeness(&self) -> Completeness {
        match (self.platform_a_success, self.platform_b_success) {
            (true, true) => Completeness::Complete,
            (false, false) => Completeness::Failed,
            _ => Completeness::Partial,
        }
    }

    pub fn get(&self, metric: impl Into<Metric>) -> Option<&MetricComparison> {
        let metric = metric.into();
        self.metrics.iter().find(|m| m.metric == metric)
    }

    pub fn ratio(&self, metric: impl Into<Metric>) -> Option<Ratio> {
        self.get(metric).map(|m| m.ratio)
    }
}

/// Builds the comparison record for `benchmark`.
///
/// Uses whatever values the loader and calculator produced; a failed load
/// simply contributes zeros.
pub fn compare(
    catalog: &Catalog,
    benchmark: &str,
    a: &LoadedCounters,
    b: &LoadedCounters,
    derived_a: &DerivedMetrics,
    derived_b: &DerivedMetrics,
) -> ComparisonRecord {
    let metrics = catalog
        .metrics()
        .into_iter()
        .map(|metric| {
            let (va, vb) = match metric {
                Metric::Base(m) => (a.record.get(m), b.record.get(m)),
                Metric::Derived(m) => (derived_a.get(m), derived_b.get(m)),
            };
            let ratio = Ratio::of(va, vb);
            debug!(benchmark, %metric, a = va, b = vb, %ratio, "compared");
            MetricComparison {
                metric,
                platform_a: va,
                platform_b: vb,
                ratio,
            }
        })
        .collect();

    ComparisonRecord {
        benchmark: benchmark.to_string(),
        category: catalog.category_of(benchmark),
        platform_a_success: a.success,
        platform_b_success: b.success,
        metrics,
    }
}
