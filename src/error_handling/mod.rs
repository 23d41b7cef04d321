//! Error handling.
//!
//! This module provides:
//! - The categorized probe error taxonomy (`ProbeError`, `ErrorCategory`)
//! - Initialization errors for process setup (logger)
//!
//! Every probe failure terminates the run except a failed ALPN probe, which the
//! redirect orchestrator treats as "HTTP/2 support undetermined" for that hop.

mod types;

// Re-export public API
pub use types::{ErrorCategory, InitializationError, ProbeError};
