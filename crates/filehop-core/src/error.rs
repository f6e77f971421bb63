//! Error types for navigation and file operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the navigator and its filesystem collaborator.
#[derive(Debug, Error)]
pub enum NavError {
    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Target of a create or rename already exists.
    #[error("'{}' already exists", path.display())]
    AlreadyExists { path: PathBuf },

    /// A user-supplied file name was rejected.
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// A symbolic root (`~`, `@`, `$env:NAME`) has no value.
    #[error("Cannot resolve {root}")]
    UnresolvedRoot { root: String },

    /// An operation was attempted on a path that violates its invariant,
    /// such as renaming a root.
    #[error("Precondition violated: {message}")]
    Precondition { message: String },

    /// Host capability failed (clipboard, editor launch, storage).
    #[error("{message}")]
    Other { message: String },
}

impl NavError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create a precondition violation.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// Create a host capability failure.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this is a missing-path error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error must halt the current operation instead of being
    /// reported as a notice.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Precondition { .. })
    }
}
