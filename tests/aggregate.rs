//! Aggregation over the fixture results tree and synthetic sources.

mod common;

use common::{catalog, data_dir, fixture_catalog, record};
use counter_compare::{
    Aggregator, BaseMetric, Category, Completeness, DerivedMetric, DirectorySource, MemorySource,
    Ratio,
};

fn fixture_run() -> counter_compare::Aggregation {
    let catalog = fixture_catalog();
    let source = DirectorySource::new(data_dir());
    Aggregator::new(&catalog, &source).aggregate(&catalog.benchmark_names())
}

#[test]
fn fixture_counts() {
    let agg = fixture_run();
    assert_eq!(agg.total_count, 6);
    assert_eq!(agg.success_count, 4);
    assert!(!agg.all_complete());
    assert_eq!(agg.summary.total_benchmarks, 6);
    assert_eq!(agg.summary.standard_benchmarks, 4);
    assert_eq!(agg.summary.ternary_specific_benchmarks, 2);
    assert_eq!(agg.summary.success_count, 4);
}

#[test]
fn records_follow_input_order() {
    let agg = fixture_run();
    let names: Vec<&str> = agg.records.iter().map(|r| r.benchmark.as_str()).collect();
    assert_eq!(
        names,
        ["sum_array", "memcpy", "factorial", "function_call", "ternary_logic", "special_states"]
    );
    assert_eq!(agg.records[2].completeness(), Completeness::Partial);
    assert_eq!(agg.records[3].completeness(), Completeness::Partial);
}

#[test]
fn fixture_global_averages_exclude_sentinels() {
    let agg = fixture_run();
    let avg = &agg.summary.avg_ratios;
    // sum_array 0.8333, memcpy 1.1111, ternary_logic 0.6667; factorial and
    // special_states are undefined, function_call is zero.
    assert_eq!(avg.get(BaseMetric::InstructionCount), Some(0.8704));
    // memcpy has no branches on either platform.
    assert_eq!(avg.get(BaseMetric::Branches), Some(0.8222));
    assert_eq!(avg.get(DerivedMetric::InstMemRatio), Some(1.088));
}

#[test]
fn fixture_category_averages() {
    let agg = fixture_run();
    let standard = agg.summary.category_avg_ratios.get(Category::Standard).unwrap();
    let ternary = agg.summary.category_avg_ratios.get(Category::TernarySpecific).unwrap();
    assert_eq!(standard.get(BaseMetric::InstructionCount), Some(0.9722));
    assert_eq!(ternary.get(BaseMetric::InstructionCount), Some(0.6667));
    assert_eq!(ternary.get(DerivedMetric::CodeDensity), Some(1.3333));
    assert_eq!(standard.get(DerivedMetric::InstMemRatio), Some(1.0764));
    assert!(agg.summary.category_avg_ratios.get(Category::Unknown).is_none());
}

#[test]
fn aggregate_is_idempotent() {
    assert_eq!(fixture_run(), fixture_run());
}

#[test]
fn loop_sum_scenario() {
    let catalog = catalog(&["loop_sum"], &[]);
    let mut source = MemorySource::new();
    source.insert_record("prismchrono", "loop_sum", &record([1000.0, 500.0, 250.0, 150.0, 80.0, 40.0])).unwrap();
    source.insert_record("x86", "loop_sum", &record([1200.0, 400.0, 300.0, 200.0, 100.0, 50.0])).unwrap();

    let agg = Aggregator::new(&catalog, &source).aggregate(&["loop_sum"]);
    assert_eq!(agg.success_count, 1);
    assert_eq!(agg.total_count, 1);
    assert!(agg.all_complete());
    assert_eq!(
        agg.records[0].ratio(BaseMetric::InstructionCount),
        Some(Ratio::Defined(0.8333))
    );
    assert_eq!(
        agg.records[0].ratio(DerivedMetric::InstMemRatio),
        Some(Ratio::Defined(1.0417))
    );
    assert_eq!(agg.summary.avg_ratios.get(BaseMetric::InstructionCount), Some(0.8333));
}

#[test]
fn all_sentinel_metric_averages_to_zero() {
    let catalog = catalog(&["a", "b"], &[]);
    let mut source = MemorySource::new();
    source.insert_record("prismchrono", "a", &record([5.0, 1.0, 1.0, 1.0, 0.0, 0.0])).unwrap();
    source.insert_record("x86", "a", &record([0.0, 1.0, 1.0, 1.0, 0.0, 0.0])).unwrap();
    source.insert_record("prismchrono", "b", &record([0.0, 1.0, 1.0, 1.0, 0.0, 0.0])).unwrap();
    source.insert_record("x86", "b", &record([0.0, 1.0, 1.0, 1.0, 0.0, 0.0])).unwrap();

    let agg = Aggregator::new(&catalog, &source).aggregate(&["a", "b"]);
    assert_eq!(agg.records[0].ratio(BaseMetric::InstructionCount), Some(Ratio::Undefined));
    assert_eq!(agg.records[1].ratio(BaseMetric::InstructionCount), Some(Ratio::ZeroOverZero));
    assert_eq!(agg.summary.avg_ratios.get(BaseMetric::InstructionCount), Some(0.0));
    assert_eq!(agg.summary.avg_ratios.get(BaseMetric::Branches), Some(0.0));
    assert_eq!(agg.summary.avg_ratios.get(BaseMetric::CodeSize), Some(1.0));
}

#[test]
fn no_sources_at_all() {
    let catalog = catalog(&["a"], &["t"]);
    let source = MemorySource::new();
    let agg = Aggregator::new(&catalog, &source).aggregate(&["a", "t", "stray"]);

    assert_eq!(agg.success_count, 0);
    assert_eq!(agg.total_count, 3);
    assert_eq!(agg.records[2].category, Category::Unknown);
    assert_eq!(agg.summary.standard_benchmarks, 1);
    assert_eq!(agg.summary.ternary_specific_benchmarks, 1);
    assert!(agg.summary.avg_ratios.iter().all(|(_, v)| v == 0.0));
}

#[test]
fn unknown_records_count_only_in_global_average() {
    let catalog = catalog(&["a"], &[]);
    let mut source = MemorySource::new();
    source.insert_record("prismchrono", "stray", &record([4.0; 6])).unwrap();
    source.insert_record("x86", "stray", &record([2.0; 6])).unwrap();

    let agg = Aggregator::new(&catalog, &source).aggregate(&["stray"]);
    assert_eq!(agg.summary.avg_ratios.get(BaseMetric::CodeSize), Some(2.0));
    let standard = agg.summary.category_avg_ratios.get(Category::Standard).unwrap();
    assert_eq!(standard.get(BaseMetric::CodeSize), Some(0.0));
}
