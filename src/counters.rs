//! Base counters and the per-platform counter record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A raw counter captured directly from a platform run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseMetric {
    InstructionCount,
    CodeSize,
    MemoryReads,
    MemoryWrites,
    Branches,
    BranchesTaken,
}

impl BaseMetric {
    /// Every known counter, in canonical order.
    pub const ALL: [BaseMetric; 6] = [
        BaseMetric::InstructionCount,
        BaseMetric::CodeSize,
        BaseMetric::MemoryReads,
        BaseMetric::MemoryWrites,
        BaseMetric::Branches,
        BaseMetric::BranchesTaken,
    ];

    /// Field name used in counter sources and output columns.
    pub fn name(self) -> &'static str {
        match self {
            BaseMetric::InstructionCount => "instruction_count",
            BaseMetric::CodeSize => "code_size",
            BaseMetric::MemoryReads => "memory_reads",
            BaseMetric::MemoryWrites => "memory_writes",
            BaseMetric::Branches => "branches",
            BaseMetric::BranchesTaken => "branches_taken",
        }
    }
}

impl fmt::Display for BaseMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BaseMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BaseMetric::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Counter values for one (benchmark, platform) pair.
///
/// Every known counter has a field. Counters the catalog does not request,
/// or that a source omits, hold zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterRecord {
    pub instruction_count: f64,
    pub code_size: f64,
    pub memory_reads: f64,
    pub memory_writes: f64,
    pub branches: f64,
    pub branches_taken: f64,
}

impl CounterRecord {
    /// The all-zero record handed downstream when a source is unusable.
    pub fn zeroed() -> Self {
        Self::default()
    }

    pub fn get(&self, metric: BaseMetric) -> f64 {
        match metric {
            BaseMetric::InstructionCount => self.instruction_count,
            BaseMetric::CodeSize => self.code_size,
            BaseMetric::MemoryReads => self.memory_reads,
            BaseMetric::MemoryWrites => self.memory_writes,
            BaseMetric::Branches => self.branches,
            BaseMetric::BranchesTaken => self.branches_taken,
        }
    }

    pub fn set(&mut self, metric: BaseMetric, value: f64) {
        let slot = match metric {
            BaseMetric::InstructionCount => &mut self.instruction_count,
            BaseMetric::CodeSize => &mut self.code_size,
            BaseMetric::MemoryReads => &mut self.memory_reads,
            BaseMetric::MemoryWrites => &mut self.memory_writes,
            BaseMetric::Branches => &mut self.branches,
            BaseMetric::BranchesTaken => &mut self.branches_taken,
        };
        *slot = value;
    }

    /// Builder-style setter, mostly for tests and fixtures.
    pub fn with(mut self, metric: BaseMetric, value: f64) -> Self {
        self.set(metric, value);
        self
    }

    /// Total memory operations (reads plus writes).
    pub fn memory_ops(&self) -> f64 {
        self.memory_reads + self.memory_writes
    }
}
