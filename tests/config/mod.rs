//! Configuration tests.

use std::time::Duration;

use dirwatcher::config::{ConfigError, ConfigLoader, WatchConfig, WatchOptions};
use tempfile::TempDir;

#[test]
fn config_file_feeds_validated_config() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("dirwatcher.toml");
    std::fs::write(&config_path, "extension = \".md\"\ninterval = 0.25\n").unwrap();

    let options = ConfigLoader::load_file(&config_path).unwrap();
    let config = WatchConfig::new(dir.path(), "TODO", options).unwrap();

    assert_eq!(config.extension(), ".md");
    assert_eq!(config.interval(), Duration::from_millis(250));
    assert!(config.matches("README.md"));
    assert!(!config.reset_on_truncate());
}

#[test]
fn relative_directory_becomes_absolute() {
    let config = WatchConfig::new(".", "magic", WatchOptions::default()).unwrap();
    assert!(config.directory().is_absolute());
}

#[test]
fn validation_errors_fail_fast() {
    let dir = TempDir::new().unwrap();

    let empty_marker = WatchConfig::new(dir.path(), "", WatchOptions::default());
    assert!(matches!(empty_marker, Err(ConfigError::EmptyMarker)));

    let zero_interval = WatchConfig::new(
        dir.path(),
        "magic",
        WatchOptions {
            interval: 0.0,
            ..Default::default()
        },
    );
    assert!(matches!(zero_interval, Err(ConfigError::InvalidInterval(_))));

    let missing = WatchConfig::new(dir.path().join("nope"), "magic", WatchOptions::default());
    let err = missing.unwrap_err();
    assert!(matches!(err, ConfigError::DirectoryNotFound(_)));
    assert!(err.to_string().contains("nope"));
}
