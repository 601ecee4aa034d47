//! Run metadata capture.

use crate::catalog::Catalog;
use crate::schema::{RunMetadata, SCHEMA_VERSION};
use chrono::{DateTime, Local, SecondsFormat};

/// Captures metadata for a run started at `started`.
pub fn capture(catalog: &Catalog, started: DateTime<Local>) -> RunMetadata {
    RunMetadata {
        schema_version: SCHEMA_VERSION,
        timestamp: started.to_rfc3339_opts(SecondsFormat::Secs, false),
        git_commit: git_short_commit(),
        git_branch: git_branch(),
        git_dirty: git_is_dirty(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        platform_a: catalog.platform_a().clone(),
        platform_b: catalog.platform_b().clone(),
    }
}

// ---------------------------------------------------------------------------
// Git helpers
// ---------------------------------------------------------------------------

fn git(args: &[&str]) -> Option<std::process::Output> {
    std::process::Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
}

fn git_short_commit() -> Option<String> {
    git(&["rev-parse", "--short", "HEAD"])
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
}

fn git_branch() -> Option<String> {
    git(&["rev-parse", "--abbrev-ref", "HEAD"])
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
}

fn git_is_dirty() -> Option<bool> {
    git(&["status", "--porcelain"]).map(|o| !o.stdout.is_empty())
}
