//! Error type definitions.
//!
//! This module defines all error types used throughout the application.

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Category of a probe failure.
///
/// Categories are what the user sees in front of the error detail
/// (`Error: {category}: {detail}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorCategory {
    /// Malformed input; the user must fix the URI
    InvalidUri,
    DnsFailure,
    ConnectionFailure,
    TlsFailure,
    Timeout,
    /// A hop resolved to a URI already visited in this run
    RedirectLoop,
    /// The configured redirect ceiling was reached
    TooManyRedirects,
    /// Catch-all
    Unexpected,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::InvalidUri => "Invalid URI format",
            ErrorCategory::DnsFailure => "DNS lookup failed",
            ErrorCategory::ConnectionFailure => "Network connection failed",
            ErrorCategory::TlsFailure => "TLS failure",
            ErrorCategory::Timeout => "Connection timeout",
            ErrorCategory::RedirectLoop => "Redirect loop detected",
            ErrorCategory::TooManyRedirects => "Too many redirects",
            ErrorCategory::Unexpected => "Unexpected error",
        }
    }
}

/// Error returned by every probe operation.
///
/// The `Display` output is `{category}: {detail}`, so the binary only has to
/// prefix it with `Error: `.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Invalid URI format: {0}")]
    InvalidUri(String),

    #[error("DNS lookup failed: {host}: {source}")]
    DnsFailure {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Network connection failed: {0}")]
    ConnectionFailure(String),

    #[error("TLS failure: {0}")]
    TlsFailure(String),

    #[error("Connection timeout: {0}")]
    Timeout(String),

    #[error("Redirect loop detected: {0}")]
    RedirectLoop(String),

    #[error("Too many redirects: limit of {0} reached")]
    TooManyRedirects(usize),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ProbeError {
    /// Returns the category this error is reported under.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProbeError::InvalidUri(_) => ErrorCategory::InvalidUri,
            ProbeError::DnsFailure { .. } => ErrorCategory::DnsFailure,
            ProbeError::ConnectionFailure(_) => ErrorCategory::ConnectionFailure,
            ProbeError::TlsFailure(_) => ErrorCategory::TlsFailure,
            ProbeError::Timeout(_) => ErrorCategory::Timeout,
            ProbeError::RedirectLoop(_) => ErrorCategory::RedirectLoop,
            ProbeError::TooManyRedirects(_) => ErrorCategory::TooManyRedirects,
            ProbeError::Unexpected(_) => ErrorCategory::Unexpected,
        }
    }

    /// Maps an I/O error from a socket operation onto the taxonomy.
    ///
    /// `context` names the operation and peer, e.g. `connect to 1.2.3.4:443`.
    pub(crate) fn from_io(context: &str, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::TimedOut => ProbeError::Timeout(context.to_string()),
            _ => ProbeError::ConnectionFailure(format!("{context}: {error}")),
        }
    }
}
