//! Filesystem helpers for rewriting descriptor and suite files
//!
//! - `read_text`: read a file, mapping failures to `RegistrarError::Io`
//! - `write_atomic`: replace a file's content via a sibling temp file
//! - `atomic_rename`: rename that also replaces an existing target on Windows

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{RegistrarError, Result};

/// Cross-platform atomic rename that handles Windows file replacement.
///
/// On Unix, `fs::rename` atomically replaces the target if it exists.
/// On Windows, `fs::rename` fails if the target exists, so the target is
/// deleted first.
pub fn atomic_rename(src: &Path, dst: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        if dst.exists() {
            fs::remove_file(dst)?;
        }
    }
    fs::rename(src, dst)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".registrar.tmp");
    path.with_file_name(name)
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| RegistrarError::io(path, e))
}

/// Write `content` to `path` without ever exposing a half-written file
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let temp_path = temp_path_for(path);
    fs::write(&temp_path, content).map_err(|e| RegistrarError::io(&temp_path, e))?;

    if let Err(e) = atomic_rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(RegistrarError::io(path, e));
    }
    tracing::info!("Wrote {}", path.display());
    Ok(())
}
