//! Configuration file loader.

use std::path::{Path, PathBuf};

use super::{ConfigError, WatchOptions};

/// Configuration loader that searches multiple locations.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Search paths in order of priority.
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default search paths.
    #[must_use]
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        // 1. Current directory: .dirwatcher.toml
        search_paths.push(PathBuf::from(".dirwatcher.toml"));

        // 2. User config directory: ~/.config/dirwatcher/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("dirwatcher").join("config.toml"));
        }

        Self { search_paths }
    }

    /// Create a config loader with a specific config file path.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            search_paths: vec![path],
        }
    }

    /// Load options from the first available file, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<WatchOptions, ConfigError> {
        if let Some(path) = self.find_config_file() {
            tracing::debug!(path = %path.display(), "Loading config file");
            return Self::load_file(&path);
        }

        tracing::debug!(searched = ?self.search_paths(), "No config file found, using defaults");
        Ok(WatchOptions::default())
    }

    /// Load options from `path`, which must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(path: &Path) -> Result<WatchOptions, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the search paths for debugging.
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Find the first config file that exists.
    #[must_use]
    pub fn find_config_file(&self) -> Option<PathBuf> {
        self.search_paths.iter().find(|p| p.exists()).cloned()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
