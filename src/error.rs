//! Error types for Stylesync
//!
//! Uses `thiserror` for library errors. Ports keep their own narrow error
//! types and convert into [`StyleSyncError`] at the seams.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Stylesync operations
pub type StyleSyncResult<T> = Result<T, StyleSyncError>;

/// Main error type for Stylesync operations
#[derive(Error, Debug)]
pub enum StyleSyncError {
    /// Source root of an entry is missing or not a directory
    #[error("base directory {path} not found")]
    DirectoryNotFound { path: PathBuf },

    /// Output root could not be created
    #[error("error creating directory {path} after {attempts} attempts: {message}")]
    DirectoryCreateFailed {
        path: PathBuf,
        attempts: u32,
        message: String,
    },

    /// The compile collaborator rejected a source file
    #[error("failed to compile {file}: {message}")]
    Compile { file: PathBuf, message: String },

    /// A stray artifact or stale directory could not be removed
    #[error("failed to delete {path}: {message}")]
    Delete { path: PathBuf, message: String },

    /// Another writer held the manifest lock for every attempt
    #[error("manifest {path} is locked (gave up after {attempts} attempts)")]
    ManifestLocked { path: PathBuf, attempts: u32 },

    /// Any other manifest persistence failure
    #[error("error saving manifest to {path}: {message}")]
    ManifestWrite { path: PathBuf, message: String },

    /// Invalid configuration file
    #[error("invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// The filesystem watcher could not be set up
    #[error("watch error: {0}")]
    Watch(String),

    /// Work was interrupted by `stop()`
    #[error("operation cancelled")]
    Cancelled,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<notify::Error> for StyleSyncError {
    fn from(err: notify::Error) -> Self {
        StyleSyncError::Watch(err.to_string())
    }
}
