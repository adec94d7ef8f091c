//! Blocked-set tracker.
//!
//! Maps each tracked thread to the timestamp at which it was first seen
//! blocked in its current unbroken blocking episode. The map is owned by
//! the monitor's single run loop, so no synchronization is needed; a
//! per-cycle cleanup pass evicts entries for threads that unblocked or
//! terminated, replacing any reliance on weak references.

use std::collections::{HashMap, HashSet};

use crate::domain::{Tid, Timestamp};
use crate::filter::NameFilter;
use crate::snapshot::{ThreadSnapshot, ThreadState};

/// First-seen timestamps for currently blocked threads.
#[derive(Debug, Default)]
pub struct BlockedTracker {
    entries: HashMap<Tid, Timestamp>,
}

impl BlockedTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently tracked threads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First-seen timestamp for a thread, if it is tracked.
    #[must_use]
    pub fn first_seen(&self, tid: Tid) -> Option<Timestamp> {
        self.entries.get(&tid).copied()
    }

    /// Apply one cycle's snapshot: cleanup, then admission.
    ///
    /// Cleanup drops every entry whose thread is not blocked in this
    /// snapshot — including threads that terminated, since those never
    /// appear blocked again. Admission inserts `cycle_start` for each
    /// blocked, filter-eligible thread that has no entry yet; existing
    /// entries are left untouched so the first-seen time is stable for
    /// the whole episode.
    pub fn update(
        &mut self,
        snapshot: &[ThreadSnapshot],
        filter: &NameFilter,
        cycle_start: Timestamp,
    ) {
        let blocked: HashSet<Tid> = snapshot
            .iter()
            .filter(|thread| thread.state == ThreadState::Blocked)
            .map(|thread| thread.tid)
            .collect();

        self.entries.retain(|tid, _| blocked.contains(tid));

        for thread in snapshot {
            if thread.state == ThreadState::Blocked && filter.is_eligible(&thread.name) {
                self.entries.entry(thread.tid).or_insert(cycle_start);
            }
        }
    }

    /// Whether any tracked thread has been blocked longer than
    /// `threshold_ms`, measured against `now`. Computed fresh each call.
    #[must_use]
    pub fn any_blocked_longer_than(&self, threshold_ms: u64, now: Timestamp) -> bool {
        self.entries
            .values()
            .any(|first_seen| now.millis_since(*first_seen) > threshold_ms)
    }
}
