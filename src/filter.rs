//! Thread name filter.
//!
//! An optional pattern restricting which blocked threads are admitted to
//! the tracker. The pattern must match the whole name, not a substring,
//! so `worker` does not accidentally match `net-worker-reaper`.

use log::{info, warn};
use regex::Regex;

/// Compiled name filter. With no active pattern every thread is eligible.
#[derive(Debug)]
pub struct NameFilter {
    pattern: Option<Regex>,
}

impl NameFilter {
    /// Compile a filter from an optional pattern string.
    ///
    /// An invalid pattern disables the filter rather than failing startup:
    /// watching every thread beats not watching at all.
    pub fn new(pattern: Option<&str>) -> Self {
        let Some(raw) = pattern.map(str::trim).filter(|p| !p.is_empty()) else {
            return Self { pattern: None };
        };

        // Anchor so the name must match fully, mirroring a full-match test
        let anchored = format!(r"\A(?:{raw})\z");
        match Regex::new(&anchored) {
            Ok(regex) => {
                info!("filter pattern '{raw}' is active");
                Self { pattern: Some(regex) }
            }
            Err(err) => {
                warn!("filter pattern '{raw}' is invalid, tracking all threads: {err}");
                Self { pattern: None }
            }
        }
    }

    /// Whether a thread with this name may be admitted to the tracker.
    #[must_use]
    pub fn is_eligible(&self, name: &str) -> bool {
        self.pattern.as_ref().is_none_or(|regex| regex.is_match(name))
    }

    /// True when a pattern compiled and is being applied.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.pattern.is_some()
    }
}
