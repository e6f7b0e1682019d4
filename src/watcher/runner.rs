//! Driver loop that polls until cancelled.

use tokio_util::sync::CancellationToken;

use super::engine::WatchEngine;
use super::events::{EventSink, WatchEvent};

/// Totals for a finished run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Poll cycles attempted.
    pub cycles: u64,
    /// Poll cycles that failed as a whole.
    pub failed_cycles: u64,
    /// Matching lines reported.
    pub matches: usize,
}

/// Poll `engine` every configured interval until `cancel` fires.
///
/// The token is checked before every cycle and raced against the sleep
/// between cycles. A cycle that has started always runs to completion. A
/// failed cycle is reported as [`WatchEvent::PollError`] and the loop carries
/// on with the next one; errors never end the run.
pub async fn run_until_cancelled<S: EventSink>(
    engine: &mut WatchEngine<S>,
    cancel: &CancellationToken,
) -> RunSummary {
    let interval = engine.config().interval();
    let mut summary = RunSummary::default();

    tracing::debug!(
        directory = %engine.config().directory().display(),
        interval_secs = interval.as_secs_f64(),
        "Watch loop started"
    );

    while !cancel.is_cancelled() {
        summary.cycles += 1;
        match engine.poll().await {
            Ok(report) => summary.matches += report.matches,
            Err(e) => {
                summary.failed_cycles += 1;
                tracing::error!(error = %e, cycle = summary.cycles, "Poll cycle failed");
                engine
                    .sink_mut()
                    .emit(WatchEvent::PollError { error: e.to_string() });
            }
        }

        tokio::select! {
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(interval) => {}
        }
    }

    tracing::debug!(
        cycles = summary.cycles,
        failed_cycles = summary.failed_cycles,
        matches = summary.matches,
        "Watch loop stopped"
    );

    summary
}
