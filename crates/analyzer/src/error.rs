//! Error: typed failures that can escape the analysis pipeline.
//!
//! Content problems (bad lines, mis-shaped rows) never show up here; they are
//! absorbed by the parser and only visible in its metrics.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Cannot read log input {}: {source}", path.display())]
    UnreadableInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not analyze log data: unsupported format")]
    UnsupportedFormat,
}

impl AnalysisError {
    /// Stable machine-readable code for the HTTP layer
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::UnreadableInput { .. } => "UNREADABLE_INPUT",
            AnalysisError::UnsupportedFormat => "UNSUPPORTED_FORMAT",
        }
    }
}

// Convenience type alias
pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
