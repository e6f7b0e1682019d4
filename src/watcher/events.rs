//! Structured events emitted while watching.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Something the engine observed during a poll cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    /// A matching file appeared and is now tracked.
    WatchStarted { file: String },
    /// A tracked file left the directory.
    WatchRemoved { file: String },
    /// A new line contains the marker.
    MatchFound {
        file: String,
        line: u64,
        marker: String,
    },
    /// A tracked file could not be scanned this cycle.
    ScanError { file: String, error: String },
    /// A file shrank below its resume offset and is being rescanned.
    FileTruncated {
        file: String,
        previous_offset: u64,
        line_count: u64,
    },
    /// A whole poll cycle failed.
    PollError { error: String },
}

/// Destination for watch events.
pub trait EventSink {
    /// Record a single event.
    fn emit(&mut self, event: WatchEvent);
}

impl EventSink for Vec<WatchEvent> {
    fn emit(&mut self, event: WatchEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&mut self, event: WatchEvent) {
        (**self).emit(event);
    }
}

/// Logs events through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: WatchEvent) {
        match event {
            WatchEvent::WatchStarted { file } => {
                tracing::info!(%file, "Watching new file");
            }
            WatchEvent::WatchRemoved { file } => {
                tracing::info!(%file, "Removed file");
            }
            WatchEvent::MatchFound { file, line, marker } => {
                tracing::info!(%file, line, %marker, "Found magic text");
            }
            WatchEvent::ScanError { file, error } => {
                tracing::warn!(%file, %error, "Failed to scan file, keeping offset");
            }
            WatchEvent::FileTruncated {
                file,
                previous_offset,
                line_count,
            } => {
                tracing::warn!(
                    %file,
                    previous_offset,
                    line_count,
                    "File truncated, rescanning from line 1"
                );
            }
            // The driver loop already logs the failure at error level.
            WatchEvent::PollError { error } => {
                tracing::debug!(%error, "Poll error event");
            }
        }
    }
}

#[derive(Serialize)]
struct Record<'a> {
    timestamp: DateTime<Utc>,
    #[serde(flatten)]
    event: &'a WatchEvent,
}

/// Writes each event as one JSON object per line.
#[derive(Debug)]
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    /// Create a sink writing to `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the sink and return the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EventSink for JsonSink<W> {
    fn emit(&mut self, event: WatchEvent) {
        let record = Record {
            timestamp: Utc::now(),
            event: &event,
        };
        let result = serde_json::to_writer(&mut self.writer, &record)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"))
            .and_then(|()| self.writer.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to write JSON event");
        }
    }
}
