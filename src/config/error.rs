//! Configuration error types.

use std::path::PathBuf;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Cannot list directory {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Poll interval must be a positive number of seconds, got {0}")]
    InvalidInterval(f64),

    #[error("Magic text must not be empty")]
    EmptyMarker,
}
