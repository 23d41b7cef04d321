//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, chunk sizes, request header values)
//! - CLI option types and parsing
//! - Probe options passed to the library

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{LogFormat, LogLevel, Opt, ProbeOptions};
