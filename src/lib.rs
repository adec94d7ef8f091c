//! # blockwatch - Blocked-Thread Watchdog
//!
//! blockwatch attaches to a running process, samples the execution state
//! of every live thread at a fixed period, and writes a full stack dump
//! of the process when any thread stays continuously blocked past a
//! configurable threshold. Dumps are throttled to a minimum spacing so a
//! long outage produces a handful of reports, not thousands.
//!
//! ## Architecture Overview
//!
//! ```text
//!   scheduler tick (fixed delay, never overlapping)
//!        │
//!        ▼
//!   SnapshotProvider ──▶ NameFilter ──▶ BlockedTracker ──▶ threshold
//!   (/proc/<pid>/task)   (regex)        (first-seen map)      │
//!                                                             ▼
//!                                                  DumpWriter (throttled)
//!                                                  threads_dump_<ts>.txt
//! ```
//!
//! ## Module Structure
//!
//! - [`monitor`]: cycle orchestration and the fixed-delay run loop
//! - [`snapshot`]: thread snapshots and the procfs provider
//! - [`tracker`]: blocked-set map with first-seen timestamps
//! - [`dump`]: report formatting and throttled file writing
//! - [`filter`]: full-match thread-name filter
//! - [`config`]: `key=value` agent configuration string parsing
//! - [`process_lookup`]: resolve a PID from a process name via `/proc`
//! - [`cli`]: command-line argument parsing
//! - [`domain`]: core domain types (`Pid`, `Tid`, `Timestamp`) and errors
//!
//! ## Typical Usage
//!
//! ```bash
//! # Watch a process by name with defaults
//! blockwatch my-app
//!
//! # Explicit PID, 500ms sampling, 30s block threshold
//! blockwatch --pid 1234 --config interval=500,threshold=30000
//! ```

// Expose modules for testing
pub mod cli;
pub mod config;
pub mod domain;
pub mod dump;
pub mod filter;
pub mod monitor;
pub mod process_lookup;
pub mod snapshot;
pub mod tracker;
