//! End-to-end cycle scenarios driven by scripted snapshots.

use std::path::PathBuf;
use std::sync::Mutex;

use blockwatch::config::AgentConfig;
use blockwatch::domain::{Tid, Timestamp};
use blockwatch::monitor::Monitor;
use blockwatch::snapshot::{SnapshotProvider, ThreadSnapshot, ThreadState};

/// Provider that replays a fixed sequence of snapshots, then repeats the
/// last one forever.
struct ScriptedProvider {
    snapshots: Mutex<Vec<Vec<ThreadSnapshot>>>,
}

impl ScriptedProvider {
    fn new(mut snapshots: Vec<Vec<ThreadSnapshot>>) -> Self {
        assert!(!snapshots.is_empty());
        snapshots.reverse();
        Self { snapshots: Mutex::new(snapshots) }
    }
}

impl SnapshotProvider for ScriptedProvider {
    fn snapshot(&self) -> anyhow::Result<Vec<ThreadSnapshot>> {
        let mut snapshots = self.snapshots.lock().unwrap();
        if snapshots.len() > 1 {
            Ok(snapshots.pop().unwrap())
        } else {
            Ok(snapshots.last().unwrap().clone())
        }
    }
}

/// Provider whose snapshot call always fails.
struct FailingProvider;

impl SnapshotProvider for FailingProvider {
    fn snapshot(&self) -> anyhow::Result<Vec<ThreadSnapshot>> {
        anyhow::bail!("process went away")
    }
}

fn thread(tid: u32, name: &str, state: ThreadState) -> ThreadSnapshot {
    ThreadSnapshot {
        tid: Tid(tid),
        name: name.to_string(),
        priority: 20,
        kernel: false,
        state,
        frames: vec![format!("{name}_frame+0x10")],
    }
}

fn config(root: PathBuf, threshold_ms: u64, save_delay_ms: u64) -> AgentConfig {
    AgentConfig {
        debug: false,
        root_path: root,
        interval_ms: 10,
        threshold_ms,
        save_delay_ms,
        filter_regex: None,
    }
}

#[test]
fn test_blocked_thread_triggers_dump_past_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(vec![vec![
        thread(1, "main", ThreadState::Running),
        thread(2, "t1", ThreadState::Blocked),
    ]]);
    let mut monitor = Monitor::new(provider, config(dir.path().to_path_buf(), 100, 0));

    // t1 blocks at cycle 0; threshold=100 means age must exceed 100ms
    let mut dumped = None;
    for step in 0..12u64 {
        let outcome = monitor.run_cycle(Timestamp(1000 + step * 10));
        if step * 10 <= 100 {
            assert!(!outcome.blocked_too_long);
        }
        if let Some(path) = outcome.dump {
            dumped = Some(path);
            break;
        }
    }

    let path = dumped.expect("no dump written past threshold");
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("Thread:2 't1' prio=20 BLOCKED"));
    assert!(contents.contains("Thread:1 'main' prio=20 RUNNING"));
}

#[test]
fn test_filter_limits_tracking_to_matching_names() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path().to_path_buf(), 50, 0);
    cfg.filter_regex = Some("^worker-.*$".to_string());

    let provider = ScriptedProvider::new(vec![vec![
        thread(1, "worker-1", ThreadState::Blocked),
        thread(2, "main", ThreadState::Blocked),
    ]]);
    let mut monitor = Monitor::new(provider, cfg);

    monitor.run_cycle(Timestamp(1000));
    assert_eq!(monitor.tracked_count(), 1);

    // Past threshold the dump triggers off worker-1 alone, but reports both
    let outcome = monitor.run_cycle(Timestamp(1100));
    assert!(outcome.blocked_too_long);
    let contents = std::fs::read_to_string(outcome.dump.unwrap()).unwrap();
    assert!(contents.starts_with("#Threads: 2, #Blocked: 1"));
}

#[test]
fn test_throttle_allows_one_dump_per_delay_window() {
    let dir = tempfile::tempdir().unwrap();
    let provider =
        ScriptedProvider::new(vec![vec![thread(2, "t1", ThreadState::Blocked)]]);
    let mut monitor = Monitor::new(provider, config(dir.path().to_path_buf(), 10, 1000));

    monitor.run_cycle(Timestamp(1000));

    // Two individually eligible cycles 50ms apart: only the first dumps
    let first = monitor.run_cycle(Timestamp(2000));
    let second = monitor.run_cycle(Timestamp(2050));
    assert!(first.dump.is_some());
    assert!(second.blocked_too_long);
    assert!(second.dump.is_none());
    assert_eq!(monitor.last_dump(), Timestamp(2000));

    // Once the window elapses, the next eligible cycle dumps again
    let third = monitor.run_cycle(Timestamp(3000));
    assert!(third.dump.is_some());

    let files = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(files, 2);
}

#[test]
fn test_unblock_and_reblock_restarts_the_episode() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(vec![
        vec![thread(2, "t1", ThreadState::Blocked)],
        vec![thread(2, "t1", ThreadState::Running)],
        vec![thread(2, "t1", ThreadState::Blocked)],
    ]);
    let mut monitor = Monitor::new(provider, config(dir.path().to_path_buf(), 100, 0));

    monitor.run_cycle(Timestamp(1000)); // blocked, tracked
    monitor.run_cycle(Timestamp(1050)); // running, evicted
    assert_eq!(monitor.tracked_count(), 0);

    // Re-blocks at 1100: the old 1000 first-seen must not leak through,
    // so at 1150 the 100ms threshold is not yet exceeded
    monitor.run_cycle(Timestamp(1100));
    let outcome = monitor.run_cycle(Timestamp(1150));
    assert!(!outcome.blocked_too_long);

    let outcome = monitor.run_cycle(Timestamp(1201));
    assert!(outcome.blocked_too_long);
}

#[test]
fn test_failed_write_keeps_throttle_open_for_retry() {
    // Point the dump root at an existing file so every write fails
    let dir = tempfile::tempdir().unwrap();
    let occupied = dir.path().join("not-a-dir");
    std::fs::write(&occupied, b"x").unwrap();

    let provider =
        ScriptedProvider::new(vec![vec![thread(2, "t1", ThreadState::Blocked)]]);
    let mut monitor = Monitor::new(provider, config(occupied, 10, 60_000));

    monitor.run_cycle(Timestamp(1000));
    let outcome = monitor.run_cycle(Timestamp(2000));
    assert!(outcome.blocked_too_long);
    assert!(outcome.dump.is_none());

    // Throttle untouched: the very next eligible cycle retries the write
    assert_eq!(monitor.last_dump(), Timestamp(0));
    let retry = monitor.run_cycle(Timestamp(2010));
    assert!(retry.blocked_too_long);
    assert!(retry.dump.is_none()); // still failing, still retrying
    assert_eq!(monitor.last_dump(), Timestamp(0));
}

#[test]
fn test_snapshot_failure_skips_cycle_without_losing_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut monitor = Monitor::new(FailingProvider, config(dir.path().to_path_buf(), 10, 0));

    let outcome = monitor.run_cycle(Timestamp(1000));
    assert!(!outcome.blocked_too_long);
    assert!(outcome.dump.is_none());
    assert_eq!(monitor.tracked_count(), 0);
}

#[test]
fn test_no_dump_while_under_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let provider =
        ScriptedProvider::new(vec![vec![thread(2, "t1", ThreadState::Blocked)]]);
    let mut monitor = Monitor::new(provider, config(dir.path().to_path_buf(), 60_000, 0));

    for step in 0..10u64 {
        let outcome = monitor.run_cycle(Timestamp(1000 + step * 10));
        assert!(!outcome.blocked_too_long);
        assert!(outcome.dump.is_none());
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
