//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tokio_rustls::rustls::RootCertStore;

use crate::config::constants::{SOCKET_TIMEOUT, SOCKET_TIMEOUT_SECS};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line options.
///
/// The target URI itself is read from stdin; these flags only tune logging and
/// network behavior.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "web_tester",
    about = "Reads one URI from stdin and reports HTTP/2 support, cookies, \
             password protection and the final redirect destination."
)]
pub struct Opt {
    /// Log level (logs are written to stderr)
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,

    /// Timeout in seconds for each connect, handshake, send and receive
    #[arg(
        long,
        default_value_t = SOCKET_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Stop with an error after this many redirects (unbounded when omitted)
    #[arg(long)]
    pub max_redirects: Option<usize>,
}

impl Opt {
    /// Builds the library-level probe options from the parsed flags.
    pub fn probe_options(&self) -> ProbeOptions {
        ProbeOptions {
            timeout: Duration::from_secs(self.timeout),
            max_redirects: self.max_redirects,
            root_store: None,
        }
    }
}

/// Library configuration for a single probe run (no CLI dependencies).
///
/// # Examples
///
/// ```
/// use web_tester::ProbeOptions;
/// use std::time::Duration;
///
/// let options = ProbeOptions {
///     timeout: Duration::from_secs(5),
///     ..Default::default()
/// };
/// assert!(options.max_redirects.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// Timeout applied to every socket operation
    pub timeout: Duration,

    /// Maximum number of redirects to follow; `None` relies on loop detection only
    pub max_redirects: Option<usize>,

    /// Trust anchors for https hops; `None` uses the bundled Mozilla roots
    pub root_store: Option<Arc<RootCertStore>>,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            timeout: SOCKET_TIMEOUT,
            max_redirects: None,
            root_store: None,
        }
    }
}
