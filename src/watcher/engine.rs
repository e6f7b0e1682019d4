//! Poll-driven watch engine.
//!
//! Each call to [`WatchEngine::poll`] takes one snapshot of the directory,
//! starts tracking new matching files, drops files that disappeared and then
//! scans every remaining file from where the previous cycle left off.

use std::collections::BTreeSet;
use std::path::Path;

use crate::config::WatchConfig;

use super::error::WatcherError;
use super::events::{EventSink, TracingSink, WatchEvent};
use super::scanner::scan_file;
use super::watch_set::WatchSet;

/// What happened during one poll cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PollReport {
    /// Files that started being tracked.
    pub discovered: Vec<String>,
    /// Files that stopped being tracked.
    pub removed: Vec<String>,
    /// Files scanned successfully.
    pub scanned: usize,
    /// Matching lines reported across all files.
    pub matches: usize,
    /// Files whose scan failed; their offsets were left unchanged.
    pub failed: Vec<String>,
}

/// Owns the tracked file set for one directory and reconciles it each cycle.
#[derive(Debug)]
pub struct WatchEngine<S: EventSink = TracingSink> {
    config: WatchConfig,
    watch_set: WatchSet,
    sink: S,
}

impl WatchEngine<TracingSink> {
    /// Create an engine that logs events through `tracing`.
    #[must_use]
    pub fn with_tracing(config: WatchConfig) -> Self {
        Self::new(config, TracingSink)
    }
}

impl<S: EventSink> WatchEngine<S> {
    /// Create an engine with an empty watch set.
    #[must_use]
    pub fn new(config: WatchConfig, sink: S) -> Self {
        Self {
            config,
            watch_set: WatchSet::new(),
            sink,
        }
    }

    /// Configuration this engine runs with.
    #[must_use]
    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Files currently tracked.
    #[must_use]
    pub fn watch_set(&self) -> &WatchSet {
        &self.watch_set
    }

    /// The event sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the event sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the engine and return its sink.
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run one discovery, removal and scan cycle.
    ///
    /// Per-file failures are reported as [`WatchEvent::ScanError`] and never
    /// abort the cycle.
    ///
    /// # Errors
    ///
    /// Returns [`WatcherError::ListDirectory`] if the directory cannot be
    /// listed. The watch set is left untouched in that case.
    pub async fn poll(&mut self) -> Result<PollReport, WatcherError> {
        let listing = list_directory(self.config.directory()).await?;
        let mut report = PollReport::default();

        for name in &listing {
            if self.config.matches(name) && self.watch_set.insert(name.as_str()) {
                self.sink.emit(WatchEvent::WatchStarted { file: name.clone() });
                report.discovered.push(name.clone());
            }
        }

        let gone: Vec<String> = self
            .watch_set
            .names()
            .filter(|name| !listing.contains(*name))
            .map(str::to_owned)
            .collect();
        for name in gone {
            if let Some(tracked) = self.watch_set.remove(&name) {
                tracing::debug!(
                    file = %name,
                    lines_read = tracked.resume_offset.saturating_sub(1),
                    matches_found = tracked.matches_found,
                    "Stopped tracking file"
                );
            }
            self.sink.emit(WatchEvent::WatchRemoved { file: name.clone() });
            report.removed.push(name);
        }

        let tracked: Vec<String> = self.watch_set.names().map(str::to_owned).collect();
        for name in tracked {
            match self.scan_tracked(&name).await {
                Ok(found) => {
                    report.scanned += 1;
                    report.matches += found;
                }
                Err(e) => {
                    self.sink.emit(WatchEvent::ScanError {
                        file: name.clone(),
                        error: e.to_string(),
                    });
                    report.failed.push(name);
                }
            }
        }

        tracing::debug!(
            tracked = self.watch_set.len(),
            discovered = report.discovered.len(),
            removed = report.removed.len(),
            matches = report.matches,
            failed = report.failed.len(),
            "Poll cycle complete"
        );

        Ok(report)
    }

    /// Scan one tracked file and store its new offset. Returns the match count.
    async fn scan_tracked(&mut self, name: &str) -> Result<usize, WatcherError> {
        let path = self.config.directory().join(name);
        let start = self.watch_set.get(name).map_or(1, |f| f.resume_offset);
        let marker = self.config.marker();

        let mut outcome = scan_file(&path, start, marker).await?;

        if self.config.reset_on_truncate() && outcome.next_line < start {
            self.sink.emit(WatchEvent::FileTruncated {
                file: name.to_string(),
                previous_offset: start,
                line_count: outcome.line_count(),
            });
            outcome = scan_file(&path, 1, marker).await?;
        }

        for &line in &outcome.matches {
            self.sink.emit(WatchEvent::MatchFound {
                file: name.to_string(),
                line,
                marker: marker.to_string(),
            });
        }

        let found = outcome.matches.len();
        self.watch_set.advance(name, outcome.next_line, found);
        Ok(found)
    }
}

/// Names of all entries in `dir`. Names that are not valid UTF-8 are skipped.
async fn list_directory(dir: &Path) -> Result<BTreeSet<String>, WatcherError> {
    let list_err = |source| WatcherError::ListDirectory {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(list_err)?;
    let mut names = BTreeSet::new();

    while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
        match entry.file_name().into_string() {
            Ok(name) => {
                names.insert(name);
            }
            Err(raw) => {
                tracing::debug!(name = ?raw, "Skipping non-UTF-8 file name");
            }
        }
    }

    Ok(names)
}
