//! Final report assembly and rendering.

use std::fmt;

use crate::http::{extract_cookies, is_password_protected, Cookie};
use crate::probe::ProbeResult;
use crate::uri::{ParsedUri, Scheme};

/// Everything printed for a successful probe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// Host of the final URI (IPv6 literals without brackets)
    pub host: String,
    pub scheme: Scheme,
    pub port: u16,
    pub http2_supported: bool,
    pub cookies: Vec<Cookie>,
    pub password_protected: bool,
    /// Distinct IP addresses the final host resolves to
    pub resolved_ips: Vec<String>,
    pub final_uri: String,
    pub status_code: u16,
    pub redirect_count: usize,
}

impl ProbeReport {
    /// Builds the report from the probe result, its parsed final URI and the
    /// final host's addresses.
    pub fn new(result: ProbeResult, final_uri: ParsedUri, resolved_ips: Vec<String>) -> Self {
        Self {
            cookies: extract_cookies(&result.raw_headers),
            password_protected: is_password_protected(result.status_code),
            host: final_uri.host,
            scheme: final_uri.scheme,
            port: final_uri.port,
            http2_supported: result.http2_supported,
            resolved_ips,
            final_uri: result.final_uri,
            status_code: result.status_code,
            redirect_count: result.redirect_count,
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn cookie_line(cookie: &Cookie) -> String {
    let mut line = format!("cookie name: {}", cookie.name);
    if let Some(expires) = &cookie.expires {
        line.push_str(&format!(", expires time: {expires}"));
    }
    if let Some(domain) = &cookie.domain {
        line.push_str(&format!(", domain name: {domain}"));
    }
    line
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "website: {}", self.host)?;
        writeln!(f, "1. Supports http2: {}", yes_no(self.http2_supported))?;
        writeln!(f, "2. List of Cookies:")?;
        if self.cookies.is_empty() {
            writeln!(f, "(none)")?;
        }
        for cookie in &self.cookies {
            writeln!(f, "{}", cookie_line(cookie))?;
        }
        writeln!(f, "3. Password-protected: {}", yes_no(self.password_protected))?;
        writeln!(f, "--- Additional info ---")?;
        writeln!(f, "scheme: {}", self.scheme)?;
        writeln!(f, "final port: {}", self.port)?;
        if self.resolved_ips.is_empty() {
            writeln!(f, "resolved ip addresses: (none)")?;
        } else {
            writeln!(f, "resolved ip addresses: {}", self.resolved_ips.join(", "))?;
        }
        writeln!(f, "final uri: {}", self.final_uri)?;
        writeln!(f, "final status code: {}", self.status_code)?;
        writeln!(f, "redirects followed: {}", self.redirect_count)
    }
}
