//! Where raw counter documents come from.

use crate::catalog::PlatformSpec;
use crate::counters::CounterRecord;
use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Outcome of fetching the raw document for one (platform, benchmark) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceData {
    /// Nothing exists at the expected location.
    Missing { location: String },
    /// Something exists but could not be read.
    Unreadable { location: String, reason: String },
    /// The raw document text.
    Contents { location: String, text: String },
}

/// Provides raw counter documents to the loader.
pub trait CounterSource {
    fn fetch(&self, platform: &PlatformSpec, benchmark: &str) -> SourceData;
}

impl<S: CounterSource + ?Sized> CounterSource for &S {
    fn fetch(&self, platform: &PlatformSpec, benchmark: &str) -> SourceData {
        (**self).fetch(platform, benchmark)
    }
}

/// Reads `<platform dir>/<benchmark>.json`, where the platform directory is
/// the platform's `results_dir` or `<root>/raw/<platform name>`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn platform_dir(&self, platform: &PlatformSpec) -> PathBuf {
        platform
            .results_dir
            .clone()
            .unwrap_or_else(|| self.root.join("raw").join(&platform.name))
    }

    pub fn path_for(&self, platform: &PlatformSpec, benchmark: &str) -> PathBuf {
        self.platform_dir(platform).join(format!("{}.json", benchmark))
    }
}

impl CounterSource for DirectorySource {
    fn fetch(&self, platform: &PlatformSpec, benchmark: &str) -> SourceData {
        if !is_plain_name(benchmark) {
            return SourceData::Unreadable {
                location: self.platform_dir(platform).display().to_string(),
                reason: format!("benchmark name '{}' is not a plain file name", benchmark),
            };
        }
        let path = self.path_for(platform, benchmark);
        read_file(&path)
    }
}

/// A benchmark name that stays inside the platform directory when used as
/// a file stem: one normal path component, no separators of either kind.
pub fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

fn read_file(path: &Path) -> SourceData {
    let location = path.display().to_string();
    match std::fs::read_to_string(path) {
        Ok(text) => SourceData::Contents { location, text },
        Err(e) if e.kind() == io::ErrorKind::NotFound => SourceData::Missing { location },
        Err(e) => SourceData::Unreadable {
            location,
            reason: e.to_string(),
        },
    }
}

/// In-memory documents keyed by (platform name, benchmark).
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<(String, String), String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores raw document text, which need not be valid JSON.
    pub fn insert(&mut self, platform: &str, benchmark: &str, text: impl Into<String>) {
        self.documents
            .insert((platform.to_string(), benchmark.to_string()), text.into());
    }

    /// Stores a well-formed document carrying every field of `record`.
    pub fn insert_record(
        &mut self,
        platform: &str,
        benchmark: &str,
        record: &CounterRecord,
    ) -> serde_json::Result<()> {
        let text = serde_json::to_string(record)?;
        self.insert(platform, benchmark, text);
        Ok(())
    }
}

impl CounterSource for MemorySource {
    fn fetch(&self, platform: &PlatformSpec, benchmark: &str) -> SourceData {
        let location = format!("memory:{}/{}", platform.name, benchmark);
        match self
            .documents
            .get(&(platform.name.clone(), benchmark.to_string()))
        {
            Some(text) => SourceData::Contents {
                location,
                text: text.clone(),
            },
            None => SourceData::Missing { location },
        }
    }
}
