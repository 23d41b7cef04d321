//! Configuration constants.
//!
//! This module defines the constants used throughout the probe, including
//! timeouts, read sizes, and the fixed values of the outgoing request.

use std::time::Duration;

// Network operation timeouts
/// Timeout applied to every socket operation (connect, TLS handshake, send, receive).
///
/// A receive that hits this timeout ends the response; a connect or handshake
/// that hits it fails the current candidate address.
pub const SOCKET_TIMEOUT_SECS: u64 = 10;
pub const SOCKET_TIMEOUT: Duration = Duration::from_secs(SOCKET_TIMEOUT_SECS);

/// Number of bytes requested per read while draining a response.
pub const READ_CHUNK_SIZE: usize = 4096;

// Scheme defaults
pub const HTTP_DEFAULT_PORT: u16 = 80;
pub const HTTPS_DEFAULT_PORT: u16 = 443;

// Request
/// User-Agent sent with every probe request.
pub const USER_AGENT: &str = "WebTester/1.0";

// ALPN protocol identifiers
pub const ALPN_H2: &[u8] = b"h2";
pub const ALPN_HTTP1: &[u8] = b"http/1.1";

// Header names
pub const HEADER_LOCATION: &str = "Location";
pub const HEADER_SET_COOKIE: &str = "Set-Cookie";

/// Status codes that are followed as redirects.
///
/// 303/307/308 are reported as final statuses.
pub const REDIRECT_STATUSES: &[u16] = &[301, 302];

/// Status code indicating the resource requires authentication.
pub const STATUS_UNAUTHORIZED: u16 = 401;
