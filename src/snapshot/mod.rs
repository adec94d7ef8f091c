//! Thread snapshots and the provider seam.
//!
//! A snapshot is the per-cycle unit of observation: every live thread of
//! the target process with its state and call stack, captured in one call.
//! The [`SnapshotProvider`] trait is the boundary between the monitoring
//! logic and the operating system, which keeps the cycle logic testable
//! against scripted snapshots.

pub mod procfs;

pub use procfs::ProcfsSnapshotProvider;

use std::fmt;

use crate::domain::Tid;

/// Coarse execution state of a thread at sampling time.
///
/// Mapped from the single-character state code in
/// `/proc/<pid>/task/<tid>/stat`. Uninterruptible sleep (`D`) is the
/// "blocked" state the tracker cares about: the thread cannot make
/// progress until whatever it is stuck on completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadState {
    Running,
    Sleeping,
    Blocked,
    Stopped,
    Zombie,
    Unknown,
}

impl ThreadState {
    /// Map a procfs stat state code to a [`ThreadState`].
    #[must_use]
    pub fn from_stat_code(code: char) -> Self {
        match code {
            'R' => Self::Running,
            'S' | 'I' => Self::Sleeping,
            'D' => Self::Blocked,
            'T' | 't' => Self::Stopped,
            'Z' => Self::Zombie,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ThreadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Running => "RUNNING",
            Self::Sleeping => "SLEEPING",
            Self::Blocked => "BLOCKED",
            Self::Stopped => "STOPPED",
            Self::Zombie => "ZOMBIE",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// One live thread at the moment of sampling. Immutable once produced;
/// a fresh set is captured every cycle.
#[derive(Debug, Clone)]
pub struct ThreadSnapshot {
    pub tid: Tid,
    pub name: String,
    pub priority: i64,
    /// Kernel thread flag, the closest procfs analog of a daemon thread.
    pub kernel: bool,
    pub state: ThreadState,
    /// Call stack, innermost frame first. Empty when unreadable.
    pub frames: Vec<String>,
}

/// Source of per-cycle thread snapshots.
///
/// One call returns a best-effort instantaneous view of all live threads.
pub trait SnapshotProvider {
    /// Capture the current set of live threads with state and stack.
    ///
    /// # Errors
    /// Fails when the target process can no longer be observed at all
    /// (e.g. it exited). Per-thread read failures are not errors; those
    /// threads are simply absent from the snapshot.
    fn snapshot(&self) -> anyhow::Result<Vec<ThreadSnapshot>>;
}
