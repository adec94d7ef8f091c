//! Procfs-backed snapshot provider.
//!
//! Reads `/proc/<pid>/task/*/{stat,comm,stack}` to build the per-cycle
//! thread snapshots. Threads that vanish between the directory listing
//! and the per-thread reads are skipped; an unreadable stack file (it
//! requires elevated privileges on most systems) degrades to an empty
//! frame list rather than failing the snapshot.

use anyhow::{Context, Result};
use std::fs;

use crate::domain::{Pid, Tid};

use super::{SnapshotProvider, ThreadSnapshot, ThreadState};

/// PF_KTHREAD bit of the stat flags field.
const PF_KTHREAD: u64 = 0x0020_0000;

/// Snapshot provider reading the /proc filesystem for one target process.
#[derive(Debug, Clone, Copy)]
pub struct ProcfsSnapshotProvider {
    pid: Pid,
}

impl ProcfsSnapshotProvider {
    #[must_use]
    pub fn new(pid: Pid) -> Self {
        Self { pid }
    }

    fn read_thread(&self, tid: Tid) -> Option<ThreadSnapshot> {
        let base = format!("/proc/{}/task/{}", self.pid, tid);

        let stat = fs::read_to_string(format!("{base}/stat")).ok()?;
        let parsed = parse_stat(&stat)?;

        // comm gives the up-to-date name; fall back to the stat copy
        let name = fs::read_to_string(format!("{base}/comm"))
            .map_or(parsed.comm, |comm| comm.trim().to_string());

        Some(ThreadSnapshot {
            tid,
            name,
            priority: parsed.priority,
            kernel: parsed.kernel,
            state: parsed.state,
            frames: read_stack(&base),
        })
    }
}

impl SnapshotProvider for ProcfsSnapshotProvider {
    fn snapshot(&self) -> Result<Vec<ThreadSnapshot>> {
        let task_dir = format!("/proc/{}/task", self.pid);
        let entries =
            fs::read_dir(&task_dir).with_context(|| format!("failed to read {task_dir}"))?;

        let mut threads: Vec<ThreadSnapshot> = entries
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let tid = entry.file_name().to_string_lossy().parse::<u32>().ok()?;
                self.read_thread(Tid(tid))
            })
            .collect();

        // Deterministic report ordering
        threads.sort_by_key(|thread| thread.tid);

        Ok(threads)
    }
}

struct StatFields {
    comm: String,
    state: ThreadState,
    priority: i64,
    kernel: bool,
}

/// Parse `/proc/<pid>/task/<tid>/stat`.
/// Format: `tid (comm) state ppid ...` — comm may itself contain
/// parentheses, so the comm span runs to the *last* closing paren.
fn parse_stat(stat: &str) -> Option<StatFields> {
    let open = stat.find('(')?;
    let close = stat.rfind(')')?;
    if open >= close {
        return None;
    }

    let comm = stat[open + 1..close].to_string();
    let rest: Vec<&str> = stat[close + 1..].split_whitespace().collect();

    // Fields after comm: state is field 3 overall, flags field 9, priority
    // field 18; as offsets past the comm that is 0, 6, and 15.
    let state = ThreadState::from_stat_code(rest.first()?.chars().next()?);
    let flags = rest.get(6).and_then(|f| f.parse::<u64>().ok()).unwrap_or(0);
    let priority = rest.get(15).and_then(|p| p.parse::<i64>().ok()).unwrap_or(0);

    Some(StatFields {
        comm,
        state,
        priority,
        kernel: flags & PF_KTHREAD != 0,
    })
}

fn read_stack(base: &str) -> Vec<String> {
    match fs::read_to_string(format!("{base}/stack")) {
        Ok(text) => text
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect(),
        Err(_) => Vec::new(),
    }
}
