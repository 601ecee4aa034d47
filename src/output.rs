//! Persists run artifacts.
//!
//! Each artifact is written as `<base>_<YYYYmmdd_HHMMSS>.<ext>` and as
//! `<base>_latest.<ext>`. Files are written to a temporary file in the
//! target directory and renamed into place, so a reader never sees a
//! half-written `latest` file.

use crate::aggregate::Aggregation;
use crate::catalog::Catalog;
use crate::error::OutputError;
use crate::schema::{self, RunMetadata};
use serde_json::{Map, Value};
use chrono::{DateTime, Local};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const COMBINED_BASENAME: &str = "combined_metrics";
pub const STATS_BASENAME: &str = "stats";
pub const METADATA_BASENAME: &str = "run_metadata";

/// Writes the combined JSON, the CSV table, the statistics and the run
/// metadata.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
    stamp: Option<String>,
}

impl ArtifactWriter {
    /// Writes both timestamped and `latest` artifacts.
    pub fn new(dir: impl Into<PathBuf>, started: DateTime<Local>) -> Self {
        Self {
            dir: dir.into(),
            stamp: Some(started.format("%Y%m%d_%H%M%S").to_string()),
        }
    }

    /// Writes only the `latest` artifacts.
    pub fn latest_only(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            stamp: None,
        }
    }

    /// Writes every artifact and returns the paths written.
    pub fn write_all(
        &self,
        catalog: &Catalog,
        aggregation: &Aggregation,
        metadata: RunMetadata,
    ) -> Result<Vec<PathBuf>, OutputError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| OutputError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let records: Vec<Map<String, Value>> = aggregation
            .records
            .iter()
            .map(|r| schema::record_object(catalog, r))
            .collect();
        let json = serde_json::to_vec_pretty(&records)?;
        let csv = render_csv(catalog, aggregation)?;
        let stats = serde_json::to_vec_pretty(&aggregation.summary)?;
        let metadata = serde_json::to_vec_pretty(&metadata)?;

        let mut written = Vec::new();
        written.extend(self.emit(COMBINED_BASENAME, "json", &json)?);
        written.extend(self.emit(COMBINED_BASENAME, "csv", &csv)?);
        written.extend(self.emit(STATS_BASENAME, "json", &stats)?);
        written.extend(self.emit(METADATA_BASENAME, "json", &metadata)?);
        Ok(written)
    }

    fn emit(&self, base: &str, ext: &str, bytes: &[u8]) -> Result<Vec<PathBuf>, OutputError> {
        let mut names = Vec::with_capacity(2);
        if let Some(stamp) = &self.stamp {
            names.push(format!("{}_{}.{}", base, stamp, ext));
        }
        names.push(format!("{}_latest.{}", base, ext));

        let mut written = Vec::with_capacity(names.len());
        for name in names {
            let path = self.dir.join(name);
            write_atomic(&self.dir, &path, bytes)?;
            info!(path = %path.display(), "wrote artifact");
            written.push(path);
        }
        Ok(written)
    }
}

fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> Result<(), OutputError> {
    let mut tmp =
        tempfile::NamedTempFile::new_in(dir).map_err(|e| OutputError::write(path, e))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.flush())
        .map_err(|e| OutputError::write(path, e))?;
    tmp.persist(path)
        .map_err(|e| OutputError::write(path, e.error))?;
    Ok(())
}

/// Renders the tabular form.
pub fn render_csv(catalog: &Catalog, aggregation: &Aggregation) -> Result<Vec<u8>, OutputError> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        writer.write_record(schema::columns(catalog))?;
        for record in &aggregation.records {
            writer.write_record(schema::record_row(catalog, record))?;
        }
        writer.flush().map_err(csv::Error::from)?;
    }
    Ok(buf)
}
