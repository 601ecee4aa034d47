//! Cross-platform counter comparison tool.
//!
//! Loads the raw counter files of both platforms for every configured
//! benchmark, writes the combined JSON/CSV and summary statistics, and prints
//! a summary table.
//!
//! Usage: `cargo run --bin counter-compare -- --config config.json --results-dir results`

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use counter_compare::aggregate::Aggregation;
use counter_compare::output::ArtifactWriter;
use counter_compare::{metadata, Aggregator, Catalog, Category, Completeness, DirectorySource};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "counter-compare")]
#[command(about = "Compare per-benchmark performance counters of two platforms")]
#[command(version)]
struct Args {
    /// Catalog document listing benchmarks, metrics and platforms
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Results root; raw counters are read from `<dir>/raw/<platform>`
    #[arg(short, long, default_value = "results")]
    results_dir: PathBuf,

    /// Where artifacts go (default: `<results-dir>/raw/combined`)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Only process these benchmarks, in this order (repeatable)
    #[arg(long = "only", value_name = "BENCHMARK")]
    only: Vec<String>,

    /// Skip the timestamped copies and write only the `latest` artifacts
    #[arg(long)]
    latest_only: bool,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    setup_logging(&args.log_level);

    let started = Local::now();
    let catalog = Catalog::from_path(&args.config)
        .with_context(|| format!("failed to load catalog {}", args.config.display()))?;

    let benchmarks = if args.only.is_empty() {
        catalog.benchmark_names()
    } else {
        args.only.clone()
    };
    info!(
        a = catalog.platform_a().label(),
        b = catalog.platform_b().label(),
        benchmarks = benchmarks.len(),
        "starting comparison"
    );

    let source = DirectorySource::new(&args.results_dir);
    let aggregation = Aggregator::new(&catalog, &source).aggregate(&benchmarks);

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| args.results_dir.join("raw").join("combined"));
    let writer = if args.latest_only {
        ArtifactWriter::latest_only(output_dir)
    } else {
        ArtifactWriter::new(output_dir, started)
    };
    // A failed write still leaves the console summary; only the comparison
    // outcome decides the exit status.
    match writer.write_all(&catalog, &aggregation, metadata::capture(&catalog, started)) {
        Ok(written) => {
            for path in &written {
                eprintln!("Results saved to {}", path.display());
            }
        }
        Err(e) => error!(error = %e, "failed to write artifacts"),
    }

    print_records(&catalog, &aggregation);
    print_averages(&catalog, &aggregation);

    let incomplete = aggregation.total_count - aggregation.success_count;
    if aggregation.all_complete() {
        info!("comparison finished");
        Ok(ExitCode::SUCCESS)
    } else if aggregation.success_count > 0 {
        warn!(incomplete, "comparison finished with incomplete benchmarks");
        Ok(ExitCode::SUCCESS)
    } else {
        error!("no benchmark has results on both platforms");
        Ok(ExitCode::FAILURE)
    }
}

fn setup_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_records(catalog: &Catalog, aggregation: &Aggregation) {
    let base: Vec<_> = catalog.base_metrics().collect();

    let mut header = format!("{:<28} | {:<16} | {:<8}", "Benchmark", "Category", "Status");
    for metric in &base {
        header.push_str(&format!(" | {:>17}", metric.name()));
    }
    println!("{}", header);
    println!("{}", "-".repeat(header.len()));

    for record in &aggregation.records {
        let status = match record.completeness() {
            Completeness::Complete => "ok",
            Completeness::Partial => "partial",
            Completeness::Failed => "missing",
        };
        let mut line = format!(
            "{:<28} | {:<16} | {:<8}",
            record.benchmark,
            record.category.name(),
            status
        );
        for metric in &base {
            let ratio = record
                .ratio(*metric)
                .map(|r| r.to_string())
                .unwrap_or_default();
            line.push_str(&format!(" | {:>17}", ratio));
        }
        println!("{}", line);
    }

    println!("{}", "-".repeat(header.len()));
    let partial = aggregation
        .records
        .iter()
        .filter(|r| r.completeness() == Completeness::Partial)
        .count();
    println!(
        "Complete: {}/{} | Partial: {} | Missing: {}",
        aggregation.success_count,
        aggregation.total_count,
        partial,
        aggregation.total_count - aggregation.success_count - partial,
    );
}

fn print_averages(catalog: &Catalog, aggregation: &Aggregation) {
    let summary = &aggregation.summary;
    println!();
    println!(
        "Average ratios ({} / {}), sentinel ratios excluded",
        catalog.platform_a().label(),
        catalog.platform_b().label()
    );
    println!(
        "{:<36} | {:>10} | {:>10} | {:>16}",
        "Metric",
        "All",
        Category::Standard.title(),
        Category::TernarySpecific.title()
    );
    println!("{}", "-".repeat(82));
    for (metric, all) in summary.avg_ratios.iter() {
        let per = |c: Category| {
            summary
                .category_avg_ratios
                .get(c)
                .and_then(|a| a.get(metric))
                .unwrap_or(0.0)
        };
        println!(
            "{:<36} | {:>10.4} | {:>10.4} | {:>16.4}",
            catalog.describe(metric),
            all,
            per(Category::Standard),
            per(Category::TernarySpecific),
        );
    }
    println!(
        "Benchmarks: {} standard, {} ternary specific, {} total",
        summary.standard_benchmarks, summary.ternary_specific_benchmarks, summary.total_benchmarks
    );
}
