//! Error types for search runs.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors from a single directory's search run.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The search tool is not installed or not on `PATH`.
    #[error("Search tool '{program}' not found")]
    ToolNotFound { program: String },

    /// The process could not be started.
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process exited with a failure status.
    #[error("Search in {} failed ({status}): {stderr}", dir.display())]
    Process {
        dir: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    /// A newer generation replaced this run.
    #[error("Search cancelled")]
    Cancelled,

    /// I/O error while talking to the process.
    #[error("I/O error in {}: {source}", dir.display())]
    Io {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SearchError {
    /// Create an I/O error with directory context.
    pub fn io(dir: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            dir: dir.into(),
            source,
        }
    }

    /// Check if the run was cancelled rather than failed.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
