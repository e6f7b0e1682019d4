//! Integration tests for the watch engine.

use std::io::Write;
use std::path::Path;

use dirwatcher::config::{WatchConfig, WatchOptions};
use dirwatcher::watcher::{WatchEngine, WatchEvent};
use tempfile::TempDir;

fn engine(dir: &Path) -> WatchEngine<Vec<WatchEvent>> {
    let config = WatchConfig::new(dir, "findme", WatchOptions::default()).unwrap();
    WatchEngine::new(config, Vec::new())
}

fn append_line(path: &Path, line: &str) {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(path)
        .unwrap();
    writeln!(file, "{line}").unwrap();
}

#[tokio::test]
async fn scenario_add_append_delete() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine(dir.path());

    // Empty directory: nothing happens.
    engine.poll().await.unwrap();
    assert!(engine.sink().is_empty());

    let path = dir.path().join("a.txt");
    std::fs::write(&path, "hello\nfindme\nworld\n").unwrap();
    engine.poll().await.unwrap();
    assert_eq!(
        std::mem::take(engine.sink_mut()),
        vec![
            WatchEvent::WatchStarted {
                file: "a.txt".to_string()
            },
            WatchEvent::MatchFound {
                file: "a.txt".to_string(),
                line: 2,
                marker: "findme".to_string()
            },
        ]
    );
    assert_eq!(engine.watch_set().get("a.txt").unwrap().resume_offset, 4);

    append_line(&path, "findme again");
    engine.poll().await.unwrap();
    assert_eq!(
        std::mem::take(engine.sink_mut()),
        vec![WatchEvent::MatchFound {
            file: "a.txt".to_string(),
            line: 4,
            marker: "findme".to_string()
        }]
    );
    assert_eq!(engine.watch_set().get("a.txt").unwrap().resume_offset, 5);

    std::fs::remove_file(&path).unwrap();
    engine.poll().await.unwrap();
    assert_eq!(
        std::mem::take(engine.sink_mut()),
        vec![WatchEvent::WatchRemoved {
            file: "a.txt".to_string()
        }]
    );

    engine.poll().await.unwrap();
    assert!(engine.sink().is_empty());
}

#[tokio::test]
async fn scenario_other_extension_never_discovered() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine(dir.path());
    let path = dir.path().join("b.dat");
    std::fs::write(&path, "findme\n").unwrap();

    for _ in 0..3 {
        engine.poll().await.unwrap();
        append_line(&path, "findme");
    }

    assert!(engine.watch_set().is_empty());
    assert!(engine.sink().is_empty());
}

#[tokio::test]
async fn restart_rescans_from_the_beginning() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.txt"), "findme\n").unwrap();

    let mut first = engine(dir.path());
    first.poll().await.unwrap();
    let mut second = engine(dir.path());
    second.poll().await.unwrap();

    assert_eq!(first.into_sink(), second.into_sink());
}

#[tokio::test]
async fn custom_extension_is_exact_suffix() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("app.log"), "findme\n").unwrap();
    std::fs::write(dir.path().join("app.log.1"), "findme\n").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "findme\n").unwrap();

    let options = WatchOptions {
        extension: ".log".to_string(),
        ..Default::default()
    };
    let config = WatchConfig::new(dir.path(), "findme", options).unwrap();
    let mut engine = WatchEngine::new(config, Vec::new());

    let report = engine.poll().await.unwrap();

    assert_eq!(report.discovered, vec!["app.log"]);
    assert_eq!(report.matches, 1);
}

#[tokio::test]
async fn file_replaced_between_cycles_keeps_name_identity() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.txt");
    std::fs::write(&path, "one\ntwo\n").unwrap();
    let mut engine = engine(dir.path());
    engine.poll().await.unwrap();

    // Delete and recreate under the same name within one interval: tracked
    // by name, so the offset carries over.
    std::fs::remove_file(&path).unwrap();
    std::fs::write(&path, "one\ntwo\nfindme\n").unwrap();
    engine.sink_mut().clear();
    let report = engine.poll().await.unwrap();

    assert!(report.discovered.is_empty());
    assert!(report.removed.is_empty());
    assert_eq!(
        engine.sink().as_slice(),
        &[WatchEvent::MatchFound {
            file: "a.txt".to_string(),
            line: 3,
            marker: "findme".to_string()
        }]
    );
}
