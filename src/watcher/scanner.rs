//! Line scanner for marker text.
//!
//! Reads a file from the top, skips lines that were already seen and reports
//! the line numbers of every new line that contains the marker.

use std::path::Path;

use memchr::memmem::Finder;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::error::WatcherError;

/// Result of scanning one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Line number to resume from on the next scan (one past the last line read).
    pub next_line: u64,
    /// 1-based line numbers that contained the marker, in file order.
    pub matches: Vec<u64>,
}

impl ScanOutcome {
    /// Number of lines the file had when it was read.
    #[must_use]
    pub fn line_count(&self) -> u64 {
        self.next_line.saturating_sub(1)
    }
}

/// Scan `path` for `marker`, starting at 1-based line `start_line`.
///
/// Lines before `start_line` are counted but not inspected. A trailing run of
/// bytes without a newline counts as a line. Matching is an exact,
/// case-sensitive byte substring test, so files that are not valid UTF-8 are
/// still scanned. A `start_line` of 0 is treated as 1.
///
/// # Errors
///
/// Returns an error if:
/// - The file no longer exists ([`WatcherError::FileDeleted`])
/// - Access is denied ([`WatcherError::PermissionDenied`])
/// - The path is not a regular file ([`WatcherError::NotAFile`])
/// - Any other I/O error occurs while reading
pub async fn scan_file(
    path: &Path,
    start_line: u64,
    marker: &str,
) -> Result<ScanOutcome, WatcherError> {
    let file = match File::open(path).await {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(WatcherError::FileDeleted(path.to_path_buf()));
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(WatcherError::PermissionDenied(path.to_path_buf()));
        }
        Err(e) => return Err(WatcherError::Io(e)),
    };

    // Directories open fine on unix; reading them is what fails.
    if !file.metadata().await?.is_file() {
        return Err(WatcherError::NotAFile(path.to_path_buf()));
    }

    let start_line = start_line.max(1);
    let finder = Finder::new(marker.as_bytes());
    let mut reader = BufReader::new(file);
    let mut line = Vec::new();
    let mut line_num: u64 = 0;
    let mut matches = Vec::new();

    loop {
        line.clear();
        let bytes_read = reader.read_until(b'\n', &mut line).await?;
        if bytes_read == 0 {
            break;
        }

        line_num += 1;
        if line_num < start_line {
            continue;
        }

        if contains(&line, &finder) {
            tracing::trace!(path = %path.display(), line = line_num, "Marker found");
            matches.push(line_num);
        }
    }

    Ok(ScanOutcome {
        next_line: line_num + 1,
        matches,
    })
}

fn contains(haystack: &[u8], finder: &Finder<'_>) -> bool {
    finder.find(haystack).is_some()
}
