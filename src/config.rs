//! Agent configuration string parsing.
//!
//! The configuration surface is a single comma-separated string of
//! `key=value` pairs, typically passed on the command line:
//!
//! ```text
//! debug,path=/var/tmp/dumps,interval=500,threshold=30000,delay=60000,filterRegex=^worker-.*$
//! ```
//!
//! Recognized keys: `debug` (valueless), `path`, `interval`, `threshold`,
//! `delay`, `filterRegex`. Unknown keys are logged and ignored; malformed
//! numeric values abort startup.

use std::path::PathBuf;

use log::warn;

use crate::domain::ConfigError;

/// Parsed agent configuration. One instance lives for the process lifetime.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Enable verbose cycle logging.
    pub debug: bool,
    /// Directory where dump files are written.
    pub root_path: PathBuf,
    /// Milliseconds between sampling cycles.
    pub interval_ms: u64,
    /// Milliseconds a thread must stay continuously blocked to trigger a dump.
    pub threshold_ms: u64,
    /// Minimum milliseconds between successive dump writes.
    pub save_delay_ms: u64,
    /// Optional full-match pattern restricting which thread names are tracked.
    pub filter_regex: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            debug: false,
            root_path: PathBuf::from("tmp"),
            interval_ms: 1000,
            threshold_ms: 60_000,
            save_delay_ms: 60_000,
            filter_regex: None,
        }
    }
}

impl AgentConfig {
    /// Parse a comma-separated `key=value` configuration string.
    ///
    /// Empty segments are skipped, so `""` and `","` both yield the
    /// defaults. Unknown keys are logged and ignored.
    ///
    /// # Errors
    /// Returns [`ConfigError`] on a malformed numeric value or a value-less
    /// key that requires one; the agent must not start in that case.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for segment in raw.split(',') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            let (key, value) = match segment.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (segment, None),
            };

            match key {
                "debug" => config.debug = true,
                "path" => config.root_path = PathBuf::from(require_value("path", value)?),
                "interval" => config.interval_ms = parse_millis("interval", value)?,
                "threshold" => config.threshold_ms = parse_millis("threshold", value)?,
                "delay" => config.save_delay_ms = parse_millis("delay", value)?,
                "filterRegex" => {
                    config.filter_regex = Some(require_value("filterRegex", value)?.to_string());
                }
                _ => warn!("unknown config key ignored: '{segment}'"),
            }
        }

        Ok(config)
    }
}

fn require_value<'a>(key: &'static str, value: Option<&'a str>) -> Result<&'a str, ConfigError> {
    value.ok_or(ConfigError::MissingValue { key })
}

fn parse_millis(key: &'static str, value: Option<&str>) -> Result<u64, ConfigError> {
    let value = require_value(key, value)?;
    value.parse::<u64>().map_err(|source| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        source,
    })
}
