//! Artifact layout: combined JSON, CSV table, statistics and run metadata.

mod common;

use chrono::{Local, TimeZone};
use common::{data_dir, fixture_catalog};
use counter_compare::output::{render_csv, ArtifactWriter};
use counter_compare::schema::{self, RunMetadata};
use counter_compare::{metadata, Aggregator, DirectorySource};
use serde_json::Value;
use tempfile::TempDir;

fn fixture_run() -> (counter_compare::Catalog, counter_compare::Aggregation) {
    let catalog = fixture_catalog();
    let source = DirectorySource::new(data_dir());
    let agg = Aggregator::new(&catalog, &source).aggregate(&catalog.benchmark_names());
    (catalog, agg)
}

#[test]
fn columns_are_grouped_per_metric() {
    let catalog = fixture_catalog();
    let columns = schema::columns(&catalog);
    assert_eq!(columns.len(), 2 + 10 * 3);
    assert_eq!(
        &columns[..5],
        &[
            "benchmark",
            "category",
            "prismchrono_instruction_count",
            "x86_instruction_count",
            "ratio_instruction_count"
        ]
    );
    assert_eq!(columns.last().unwrap(), "ratio_code_density");
}

#[test]
fn csv_renders_sentinels() {
    let (catalog, agg) = fixture_run();
    let csv = String::from_utf8(render_csv(&catalog, &agg).unwrap()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 7);
    assert!(lines[1].starts_with("sum_array,standard,1000,1200,0.8333,500,400,1.25,"));

    let special: Vec<&str> = lines[6].split(',').collect();
    assert_eq!(special[0], "special_states");
    assert_eq!(special[1], "ternary_specific");
    assert_eq!(&special[2..5], &["500", "0", "inf"]);

    // memcpy has no branches on either side.
    let memcpy: Vec<&str> = lines[2].split(',').collect();
    assert_eq!(&memcpy[14..17], &["0", "0", "0"]);
}

#[test]
fn record_object_keeps_column_order() {
    let (catalog, agg) = fixture_run();
    let object = schema::record_object(&catalog, &agg.records[0]);
    let keys: Vec<&str> = object.keys().map(String::as_str).collect();
    assert_eq!(
        &keys[..7],
        &[
            "benchmark",
            "platform",
            "category",
            "prismchrono_success",
            "x86_success",
            "prismchrono_instruction_count",
            "x86_instruction_count",
        ]
    );
    assert_eq!(object["platform"], "both");
    assert_eq!(object["prismchrono_instruction_count"], 1000);
    assert_eq!(object["ratio_inst_mem_ratio"], 1.0417);
}

#[test]
fn writes_timestamped_and_latest_artifacts() {
    let (catalog, agg) = fixture_run();
    let out = TempDir::new().unwrap();
    let started = Local.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
    let writer = ArtifactWriter::new(out.path().join("combined"), started);

    let written = writer
        .write_all(&catalog, &agg, metadata::capture(&catalog, started))
        .unwrap();
    assert_eq!(written.len(), 8);

    let dir = out.path().join("combined");
    for name in [
        "combined_metrics_20250314_092653.json",
        "combined_metrics_latest.json",
        "combined_metrics_20250314_092653.csv",
        "combined_metrics_latest.csv",
        "stats_20250314_092653.json",
        "stats_latest.json",
        "run_metadata_20250314_092653.json",
        "run_metadata_latest.json",
    ] {
        assert!(dir.join(name).is_file(), "missing {}", name);
    }

    // Readers index the combined document as a plain list of records.
    let combined: Value = serde_json::from_str(
        &std::fs::read_to_string(dir.join("combined_metrics_latest.json")).unwrap(),
    )
    .unwrap();
    let records = combined.as_array().expect("combined document is an array");
    assert_eq!(records.len(), 6);
    assert_eq!(records[0]["benchmark"], "sum_array");
    assert_eq!(records[2]["x86_success"], false);
    assert_eq!(records[2]["ratio_instruction_count"], "inf");

    let metadata: RunMetadata = serde_json::from_str(
        &std::fs::read_to_string(dir.join("run_metadata_latest.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(metadata.schema_version, schema::SCHEMA_VERSION);
    assert_eq!(metadata.platform_a.name, "prismchrono");
    assert_eq!(metadata.timestamp, started.to_rfc3339_opts(chrono::SecondsFormat::Secs, false));

    let stats: Value =
        serde_json::from_str(&std::fs::read_to_string(dir.join("stats_latest.json")).unwrap())
            .unwrap();
    assert_eq!(stats["total_benchmarks"], 6);
    assert_eq!(stats["success_count"], 4);
    assert_eq!(stats["avg_ratios"]["instruction_count"], 0.8704);
    assert_eq!(
        stats["category_avg_ratios"]["ternary_specific"]["instruction_count"],
        0.6667
    );
}

#[test]
fn latest_only_skips_timestamped_copies() {
    let (catalog, agg) = fixture_run();
    let out = TempDir::new().unwrap();
    let writer = ArtifactWriter::latest_only(out.path());
    let written = writer
        .write_all(&catalog, &agg, metadata::capture(&catalog, Local::now()))
        .unwrap();

    assert_eq!(written.len(), 4);
    assert!(written
        .iter()
        .all(|p| p.file_name().unwrap().to_string_lossy().contains("_latest.")));
    // Nothing else, including temp files, is left behind.
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 4);
}
