use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for revstamp operations
#[derive(Error, Debug)]
pub enum RevStampError {
    #[error("Invalid revision: {0}")]
    InvalidRevision(String),

    #[error("Revision after {digits} is outside 0..=65535")]
    RevisionOutOfRange { digits: String },

    #[error("No version string exists for file \"{}\"", path.display())]
    NoVersionFound { path: PathBuf },

    #[error("No match for the {pattern} pattern in file \"{}\"", path.display())]
    PatternNotFound { path: PathBuf, pattern: String },

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in revstamp
pub type Result<T> = std::result::Result<T, RevStampError>;

impl RevStampError {
    /// Create an invalid revision error with context
    pub fn invalid_revision(msg: impl Into<String>) -> Self {
        RevStampError::InvalidRevision(msg.into())
    }

    /// Create an encoding error with context
    pub fn encoding(msg: impl Into<String>) -> Self {
        RevStampError::Encoding(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        RevStampError::Config(msg.into())
    }

    /// Create a path error with context
    pub fn path(msg: impl Into<String>) -> Self {
        RevStampError::Path(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        RevStampError::Remote(msg.into())
    }

    /// Errors that end a whole batch instead of a single file.
    pub fn is_fatal_to_batch(&self) -> bool {
        matches!(self, RevStampError::InvalidRevision(_))
    }
}
