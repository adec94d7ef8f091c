//! Structured error types for blockwatch
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! Only configuration errors are fatal; every runtime failure (snapshot,
//! directory creation, dump write) is absorbed and logged so monitoring
//! never silently stops.

use thiserror::Error;

/// Errors raised while parsing the agent configuration string.
///
/// These abort startup: an agent running with a half-understood
/// configuration would watch the wrong thing for the wrong duration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value '{value}' for config key '{key}': {source}")]
    InvalidValue {
        key: &'static str,
        value: String,
        source: std::num::ParseIntError,
    },

    #[error("config key '{key}' requires a value")]
    MissingValue { key: &'static str },
}
