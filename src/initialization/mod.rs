//! Process initialization.
//!
//! The probe needs no shared resources: the TLS configuration is built per
//! connection attempt, so logging is the only process-wide setup.

mod logger;

// Re-export public API
pub use logger::init_logger_with;
