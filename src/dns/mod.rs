//! DNS resolution.
//!
//! This module resolves hostnames through the system resolver (`getaddrinfo`
//! via `tokio::net::lookup_host`), preserving the order the resolver returns:
//! - Socket addresses for connection attempts
//! - Distinct IP address strings for the final report

mod resolution;

// Re-export public API
pub use resolution::{resolve_addresses, resolve_ip_strings};
