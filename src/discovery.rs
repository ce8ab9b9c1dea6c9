//! Test suite discovery

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::DiscoveryConfig;
use crate::error::{RegistrarError, Result};

/// A suite source file and its stem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestSuite {
    /// File name without extension, e.g. `test_vote`
    pub stem: String,
    pub path: PathBuf,
}

impl TestSuite {
    /// File name as shown in diagnostics
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.stem.clone())
    }
}

/// Stem of `name` if it follows the suite naming convention
pub fn suite_stem<'a>(name: &'a str, config: &DiscoveryConfig) -> Option<&'a str> {
    let stem = name.strip_suffix(config.extension.as_str())?;
    if stem.len() > config.prefix.len() && stem.starts_with(config.prefix.as_str()) {
        Some(stem)
    } else {
        None
    }
}

/// Find suite files directly inside `root`, sorted by stem.
///
/// Subdirectories are not searched. No matches is not an error.
pub fn discover_suites(root: &Path, config: &DiscoveryConfig) -> Result<Vec<TestSuite>> {
    let entries = fs::read_dir(root).map_err(|e| RegistrarError::io(root, e))?;

    let mut suites: Vec<TestSuite> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping unreadable entry in {}: {}", root.display(), e);
                None
            }
        })
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                tracing::debug!("Skipping non-UTF-8 file name {}", path.display());
                return None;
            };
            let stem = suite_stem(name, config)?.to_string();
            Some(TestSuite { stem, path })
        })
        .collect();

    suites.sort_by(|a, b| a.stem.cmp(&b.stem));
    tracing::debug!("Discovered {} suite(s) in {}", suites.len(), root.display());
    Ok(suites)
}
