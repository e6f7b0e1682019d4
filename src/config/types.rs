//! Configuration types.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Extension watched when none is configured.
pub const DEFAULT_EXTENSION: &str = ".txt";

/// Poll interval in seconds when none is configured.
pub const DEFAULT_INTERVAL_SECS: f64 = 1.0;

/// Tunables that may come from a config file or the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchOptions {
    /// File name suffix to watch, matched exactly (e.g. `.txt`).
    pub extension: String,
    /// Seconds between poll cycles.
    pub interval: f64,
    /// Rescan a file from line 1 when it shrinks below its resume offset.
    pub reset_on_truncate: bool,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            interval: DEFAULT_INTERVAL_SECS,
            reset_on_truncate: false,
        }
    }
}

/// Validated, immutable configuration for one watch run.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    directory: PathBuf,
    extension: String,
    interval: Duration,
    marker: String,
    reset_on_truncate: bool,
}

impl WatchConfig {
    /// Validate inputs and build a config.
    ///
    /// The directory is made absolute (without resolving symlinks) and must
    /// exist, be a directory and be listable.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker is empty, the interval is not a finite
    /// positive number, or the directory is missing, not a directory or
    /// cannot be listed.
    pub fn new(
        directory: impl AsRef<Path>,
        marker: impl Into<String>,
        options: WatchOptions,
    ) -> Result<Self, ConfigError> {
        let marker = marker.into();
        if marker.is_empty() {
            return Err(ConfigError::EmptyMarker);
        }

        let interval = parse_interval(options.interval)?;
        let directory = validate_directory(directory.as_ref())?;

        Ok(Self {
            directory,
            extension: options.extension,
            interval,
            marker,
            reset_on_truncate: options.reset_on_truncate,
        })
    }

    /// Absolute path of the watched directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File name suffix to watch.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Delay between poll cycles.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Text searched for on each line.
    #[must_use]
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Whether shrinking files are rescanned from the top.
    #[must_use]
    pub fn reset_on_truncate(&self) -> bool {
        self.reset_on_truncate
    }

    /// Whether a directory entry name is one we should watch.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        name.ends_with(&self.extension)
    }
}

fn parse_interval(secs: f64) -> Result<Duration, ConfigError> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ConfigError::InvalidInterval(secs));
    }
    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidInterval(secs))
}

fn validate_directory(directory: &Path) -> Result<PathBuf, ConfigError> {
    let path = std::path::absolute(directory).map_err(|e| ConfigError::DirectoryUnreadable {
        path: directory.to_path_buf(),
        source: e,
    })?;

    let metadata = match std::fs::metadata(&path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::DirectoryNotFound(path));
        }
        Err(e) => return Err(ConfigError::DirectoryUnreadable { path, source: e }),
    };
    if !metadata.is_dir() {
        return Err(ConfigError::NotADirectory(path));
    }

    if let Err(e) = std::fs::read_dir(&path) {
        return Err(ConfigError::DirectoryUnreadable { path, source: e });
    }

    Ok(path)
}
