//! Translate OS termination requests into a cancellation token.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Install handlers for SIGINT and SIGTERM (Ctrl+C elsewhere).
///
/// Every trapped signal logs a warning and cancels `cancel`. The handlers are
/// registered before this returns, so a signal sent afterwards can no longer
/// kill the process. Must be called from within a tokio runtime.
///
/// # Errors
///
/// Returns an error if a signal handler cannot be registered.
#[cfg(unix)]
pub fn install(cancel: CancellationToken) -> std::io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(tokio::spawn(async move {
        loop {
            let name = tokio::select! {
                Some(()) = interrupt.recv() => "SIGINT",
                Some(()) = terminate.recv() => "SIGTERM",
                else => break,
            };
            tracing::warn!(signal = name, "Received {name}, stopping after the current cycle");
            cancel.cancel();
        }
    }))
}

/// Install a Ctrl+C handler.
///
/// # Errors
///
/// Never fails on this platform; errors surface as a log line from the task.
#[cfg(not(unix))]
pub fn install(cancel: CancellationToken) -> std::io::Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                break;
            }
            tracing::warn!(signal = "CTRL_C", "Received Ctrl+C, stopping after the current cycle");
            cancel.cancel();
        }
    }))
}
