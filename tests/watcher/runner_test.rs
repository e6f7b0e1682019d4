//! Integration tests for the driver loop.

use std::time::Duration;

use dirwatcher::config::{WatchConfig, WatchOptions};
use dirwatcher::watcher::{run_until_cancelled, WatchEngine, WatchEvent};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn cancellation_during_wait_stops_before_next_cycle() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.txt"), "findme\n").unwrap();
    let options = WatchOptions {
        interval: 30.0,
        ..Default::default()
    };
    let config = WatchConfig::new(dir.path(), "findme", options).unwrap();
    let mut engine = WatchEngine::new(config, Vec::new());

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let summary = tokio::time::timeout(
        Duration::from_secs(5),
        run_until_cancelled(&mut engine, &cancel),
    )
    .await
    .expect("loop should stop promptly after cancellation");

    assert_eq!(summary.cycles, 1);
    assert_eq!(summary.failed_cycles, 0);
    assert_eq!(
        engine
            .sink()
            .iter()
            .filter(|e| matches!(e, WatchEvent::MatchFound { .. }))
            .count(),
        1
    );
}

#[tokio::test]
async fn directory_recovers_after_failed_cycles() {
    let root = TempDir::new().unwrap();
    let watched = root.path().join("watched");
    std::fs::create_dir(&watched).unwrap();
    let options = WatchOptions {
        interval: 0.02,
        ..Default::default()
    };
    let config = WatchConfig::new(&watched, "findme", options).unwrap();
    let mut engine = WatchEngine::new(config, Vec::new());
    std::fs::remove_dir(&watched).unwrap();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let restore = watched.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        std::fs::create_dir(&restore).unwrap();
        std::fs::write(restore.join("a.txt"), "findme\n").unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let summary = run_until_cancelled(&mut engine, &cancel).await;

    assert!(summary.failed_cycles >= 1);
    assert!(summary.cycles > summary.failed_cycles);
    assert_eq!(summary.matches, 1);
    assert!(engine
        .sink()
        .iter()
        .any(|e| matches!(e, WatchEvent::PollError { .. })));
}
