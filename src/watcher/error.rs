//! Watcher error types.

use std::path::PathBuf;

/// Errors that can occur while polling the watched directory.
#[derive(thiserror::Error, Debug)]
pub enum WatcherError {
    /// Tracked file vanished between listing and read.
    #[error("Watched file deleted: {0}")]
    FileDeleted(PathBuf),

    /// Permission denied accessing file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Path exists but is not a regular file.
    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),

    /// The watched directory itself could not be listed.
    #[error("Failed to list directory {path}: {source}")]
    ListDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
