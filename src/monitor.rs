//! Cycle orchestration and the fixed-delay run loop.
//!
//! One [`Monitor`] instance owns the configuration, the blocked-set
//! tracker, and the throttle state, and is driven by a single task:
//! sample → track → evaluate → maybe dump, repeated every `interval`
//! milliseconds. The sleep starts only after a cycle's work finishes, so
//! cycles never overlap even when one runs long.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};

use crate::config::AgentConfig;
use crate::domain::{Pid, Timestamp};
use crate::dump::DumpWriter;
use crate::filter::NameFilter;
use crate::snapshot::SnapshotProvider;
use crate::tracker::BlockedTracker;

/// What one cycle concluded and did.
#[derive(Debug)]
pub struct CycleOutcome {
    /// Whether any tracked thread exceeded the blocked threshold.
    pub blocked_too_long: bool,
    /// Path of the dump written this cycle, if any.
    pub dump: Option<PathBuf>,
}

/// The diagnostic agent: configuration plus all mutable monitoring state.
///
/// Generic over the snapshot source so the cycle logic can be exercised
/// with scripted snapshots in tests.
pub struct Monitor<P: SnapshotProvider> {
    provider: P,
    config: AgentConfig,
    filter: NameFilter,
    tracker: BlockedTracker,
    writer: DumpWriter,
    last_dump: Timestamp,
    blocked_too_long: bool,
}

impl<P: SnapshotProvider> Monitor<P> {
    pub fn new(provider: P, config: AgentConfig) -> Self {
        let filter = NameFilter::new(config.filter_regex.as_deref());
        let writer = DumpWriter::new(config.root_path.clone());
        Self {
            provider,
            config,
            filter,
            tracker: BlockedTracker::new(),
            writer,
            last_dump: Timestamp(0),
            blocked_too_long: false,
        }
    }

    /// Start time of the last successfully written dump (0 before any).
    #[must_use]
    pub fn last_dump(&self) -> Timestamp {
        self.last_dump
    }

    /// Number of threads currently in the blocked set.
    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.tracker.len()
    }

    /// Execute one full cycle with `cycle_start` as its clock.
    ///
    /// A failed snapshot skips the cycle: tracker and throttle state are
    /// left as they were, and monitoring resumes on the next tick.
    pub fn run_cycle(&mut self, cycle_start: Timestamp) -> CycleOutcome {
        let snapshot = match self.provider.snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("snapshot failed, skipping cycle: {err:#}");
                return CycleOutcome { blocked_too_long: self.blocked_too_long, dump: None };
            }
        };

        self.tracker.update(&snapshot, &self.filter, cycle_start);
        self.blocked_too_long = self
            .tracker
            .any_blocked_longer_than(self.config.threshold_ms, cycle_start);

        let mut dump = None;
        if self.blocked_too_long && self.throttle_open(cycle_start) {
            match self
                .writer
                .write_dump(&snapshot, self.tracker.len(), cycle_start)
            {
                Ok(path) => {
                    self.last_dump = cycle_start;
                    dump = Some(path);
                }
                Err(err) => warn!("failed to write thread dump: {err}"),
            }
        }

        CycleOutcome { blocked_too_long: self.blocked_too_long, dump }
    }

    /// Throttle check: at least `delay` ms must have passed since the
    /// last successful dump.
    fn throttle_open(&self, cycle_start: Timestamp) -> bool {
        self.last_dump.as_millis() + self.config.save_delay_ms <= cycle_start.as_millis()
    }

    /// Run cycles for the life of the target process.
    ///
    /// The first cycle executes immediately; each subsequent cycle starts
    /// `interval` ms after the previous one *finishes* (fixed delay).
    /// Exits on Ctrl-C or when the target process disappears.
    pub async fn run(mut self, target: Pid) {
        info!(
            "watching pid {target}: root '{}', interval {}ms, threshold {}ms, delay {}ms",
            self.config.root_path.display(),
            self.config.interval_ms,
            self.config.threshold_ms,
            self.config.save_delay_ms,
        );

        let interval = Duration::from_millis(self.config.interval_ms);
        let proc_path = format!("/proc/{target}");

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            let cycle_start = Timestamp::now();
            let outcome = self.run_cycle(cycle_start);
            let took = Timestamp::now().millis_since(cycle_start);

            if outcome.blocked_too_long || outcome.dump.is_some() {
                let mut msg = format!("-{cycle_start}- cycle took {took}ms");
                if outcome.blocked_too_long {
                    msg.push_str(" - threads are blocked");
                }
                if let Some(ref path) = outcome.dump {
                    msg.push_str(&format!(" - saved dump: {}", path.display()));
                }
                debug!("{msg}");
            }

            if !Path::new(&proc_path).exists() {
                info!("target process {target} exited, stopping");
                break;
            }

            tokio::select! {
                () = tokio::time::sleep(interval) => {}
                _ = &mut ctrl_c => {
                    info!("interrupted, stopping");
                    break;
                }
            }
        }
    }
}
