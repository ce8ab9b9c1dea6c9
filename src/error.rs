//! Error types and exit codes for ctest-registrar

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Main error type for registrar operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrarError {
    /// An expected anchor, delimiter or terminator line is absent
    #[error("No match found for '{pattern}' in {file}")]
    PatternNotFound { pattern: String, file: String },

    #[error("IO error at {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl RegistrarError {
    pub fn pattern_not_found(pattern: impl Into<String>, file: impl Into<String>) -> Self {
        Self::PatternNotFound {
            pattern: pattern.into(),
            file: file.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Convert error to appropriate exit code:
    /// - 1: IO error
    /// - 2: Configuration error
    /// - 3: Pattern not found
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Io { .. } => ExitCode::from(1),
            Self::Config { .. } => ExitCode::from(2),
            Self::PatternNotFound { .. } => ExitCode::from(3),
        }
    }
}

/// Result type alias for registrar operations
pub type Result<T> = std::result::Result<T, RegistrarError>;
