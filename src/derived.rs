//! Derived efficiency metrics computed from a single counter record.

use crate::counters::{BaseMetric, CounterRecord};
use crate::ratio::round4;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A ratio of two or more base counters of the same platform run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedMetric {
    /// Instructions per memory operation.
    InstMemRatio,
    /// Instructions per branch.
    InstBranchRatio,
    /// Fraction of branches taken.
    BranchTakenRatio,
    /// Instructions per unit of code size.
    CodeDensity,
}

impl DerivedMetric {
    /// Fixed output order.
    pub const ALL: [DerivedMetric; 4] = [
        DerivedMetric::InstMemRatio,
        DerivedMetric::InstBranchRatio,
        DerivedMetric::BranchTakenRatio,
        DerivedMetric::CodeDensity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DerivedMetric::InstMemRatio => "inst_mem_ratio",
            DerivedMetric::InstBranchRatio => "inst_branch_ratio",
            DerivedMetric::BranchTakenRatio => "branch_taken_ratio",
            DerivedMetric::CodeDensity => "code_density",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DerivedMetric::InstMemRatio => "Instructions / memory operations",
            DerivedMetric::InstBranchRatio => "Instructions / branches",
            DerivedMetric::BranchTakenRatio => "Taken branches / total branches",
            DerivedMetric::CodeDensity => "Instructions / code size",
        }
    }
}

impl fmt::Display for DerivedMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Any metric that appears in a comparison record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Base(BaseMetric),
    Derived(DerivedMetric),
}

impl Metric {
    pub fn name(self) -> &'static str {
        match self {
            Metric::Base(m) => m.name(),
            Metric::Derived(m) => m.name(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<BaseMetric> for Metric {
    fn from(m: BaseMetric) -> Self {
        Metric::Base(m)
    }
}

impl From<DerivedMetric> for Metric {
    fn from(m: DerivedMetric) -> Self {
        Metric::Derived(m)
    }
}

/// The four derived metrics for one platform run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub inst_mem_ratio: f64,
    pub inst_branch_ratio: f64,
    pub branch_taken_ratio: f64,
    pub code_density: f64,
}

impl DerivedMetrics {
    pub fn get(&self, metric: DerivedMetric) -> f64 {
        match metric {
            DerivedMetric::InstMemRatio => self.inst_mem_ratio,
            DerivedMetric::InstBranchRatio => self.inst_branch_ratio,
            DerivedMetric::BranchTakenRatio => self.branch_taken_ratio,
            DerivedMetric::CodeDensity => self.code_density,
        }
    }
}

/// Computes the derived metrics. A zero denominator yields 0.
pub fn derive(record: &CounterRecord) -> DerivedMetrics {
    DerivedMetrics {
        inst_mem_ratio: per(record.instruction_count, record.memory_ops()),
        inst_branch_ratio: per(record.instruction_count, record.branches),
        branch_taken_ratio: per(record.branches_taken, record.branches),
        code_density: per(record.instruction_count, record.code_size),
    }
}

fn per(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        round4(numerator / denominator)
    } else {
        0.0
    }
}
