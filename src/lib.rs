//! web_tester library: single-target HTTP/HTTPS diagnostic probe
//!
//! Given one URI, the probe follows 301/302 redirects to a final response and
//! reports whether the origin negotiates HTTP/2 over ALPN, which cookies it
//! sets, whether it answers 401, and where the redirect chain ends.
//!
//! # Example
//!
//! ```no_run
//! use web_tester::{run_probe, ProbeOptions};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = run_probe("https://example.com", &ProbeOptions::default()).await?;
//! print!("{report}");
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. All steps run sequentially, so a
//! `current_thread` runtime is sufficient.

pub mod config;
mod connection;
mod dns;
pub mod error_handling;
pub mod http;
pub mod initialization;
pub mod probe;
mod report;
mod tls;
pub mod uri;

// Re-export public API
pub use config::{LogFormat, LogLevel, Opt, ProbeOptions};
pub use connection::{connect, Connection};
pub use dns::{resolve_addresses, resolve_ip_strings};
pub use error_handling::{ErrorCategory, ProbeError};
pub use http::Cookie;
pub use probe::{follow_redirects, ProbeResult};
pub use report::ProbeReport;
pub use tls::TlsSettings;
pub use uri::{parse_uri, resolve_redirect, ParsedUri, Scheme};

/// Probes `uri` and assembles the final report.
///
/// Follows the redirect chain, then resolves the final host's IP addresses and
/// extracts cookies and password protection from the final response.
///
/// # Errors
///
/// Returns the first non-recoverable `ProbeError` of the run; no partial report
/// is produced.
pub async fn run_probe(uri: &str, options: &ProbeOptions) -> Result<ProbeReport, ProbeError> {
    let result = follow_redirects(uri, options).await?;
    let final_uri = parse_uri(&result.final_uri)?;
    let resolved_ips = resolve_ip_strings(&final_uri.host, final_uri.port).await?;
    Ok(ProbeReport::new(result, final_uri, resolved_ips))
}
