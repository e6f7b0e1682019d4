//! Directory watcher.
//!
//! Polls one directory, tracks files with the configured extension and
//! reports new lines that contain the marker text.

mod engine;
mod error;
mod events;
mod runner;
mod scanner;
mod watch_set;

pub use engine::{PollReport, WatchEngine};
pub use error::WatcherError;
pub use events::{EventSink, JsonSink, TracingSink, WatchEvent};
pub use runner::{run_until_cancelled, RunSummary};
pub use scanner::{scan_file, ScanOutcome};
pub use watch_set::{TrackedFile, WatchSet};
