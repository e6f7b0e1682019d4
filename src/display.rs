//! Colored CLI display utilities for start/stop banners.
//!
//! Banners go to stderr so stdout stays clean for `--json` event output.

use std::io::{self, Write};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use owo_colors::OwoColorize;

use crate::config::WatchConfig;
use crate::watcher::RunSummary;

/// Maximum displayed length of the marker text in banners.
const MARKER_MAX_LEN: usize = 40;

/// Get current timestamp in the same format as tracing.
fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Truncate a string to a maximum number of characters, adding ellipsis if truncated.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}

/// Format an uptime as `H:MM:SS.ffffff`. Hours are not wrapped into days.
#[must_use]
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    let micros = uptime.subsec_micros();
    format!("{hours}:{minutes:02}:{seconds:02}.{micros:06}")
}

/// Print the banner shown when watching starts.
pub fn print_start_banner(config: &WatchConfig, started_at: DateTime<Utc>) {
    eprintln!(
        "{} {} Watching {} for {} (ext={}, interval={}s, started {})",
        timestamp().dimmed(),
        "[START]".green().bold(),
        config.directory().display().cyan(),
        truncate(config.marker(), MARKER_MAX_LEN).bold(),
        config.extension(),
        config.interval().as_secs_f64(),
        started_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .dimmed()
    );
    if config.reset_on_truncate() {
        eprintln!(
            "{} {} Truncated files will be rescanned from line 1",
            timestamp().dimmed(),
            "[START]".green().bold(),
        );
    }
    let _ = io::stderr().flush();
}

/// Print the banner shown after the watch loop stops.
pub fn print_stop_banner(uptime: Duration, summary: &RunSummary) {
    eprintln!(
        "{} {} Uptime was {} ({} cycles, {} failed, {} matches)",
        timestamp().dimmed(),
        "[STOP]".blue().bold(),
        format_uptime(uptime).cyan(),
        summary.cycles,
        summary.failed_cycles,
        summary.matches
    );
    let _ = io::stderr().flush();
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), message);
    let _ = io::stderr().flush();
}
