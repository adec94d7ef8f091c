//! Domain model for blockwatch
//!
//! Core identity and error types shared across the crate:
//! - Compile-time safety via newtype pattern
//! - Self-documenting function signatures
//! - Structured error handling

pub mod errors;
pub mod types;

// Re-export common types for convenience
pub use errors::ConfigError;
pub use types::{Pid, Tid, Timestamp};
