//! URI parsing and redirect resolution.
//!
//! Only the pieces the probe needs are understood: scheme, host, port and the
//! path (everything from the first `/` after the authority, query included).
//! Input without a scheme is treated as `https`.

use std::fmt;
use std::str::FromStr;

use crate::config::{HTTPS_DEFAULT_PORT, HTTP_DEFAULT_PORT};
use crate::error_handling::ProbeError;

const SCHEME_MARKER: &str = "://";

/// URI scheme supported by the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// Well-known port for the scheme (80 or 443).
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => HTTP_DEFAULT_PORT,
            Scheme::Https => HTTPS_DEFAULT_PORT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    /// Whether connections for this scheme are wrapped in TLS.
    pub fn is_tls(self) -> bool {
        matches!(self, Scheme::Https)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            other => Err(ProbeError::InvalidUri(format!(
                "Unsupported scheme: {other:?}"
            ))),
        }
    }
}

/// A URI decomposed into the parts needed to open a connection and send a request.
///
/// IPv6 literal hosts are stored without brackets; use [`ParsedUri::host_for_uri`]
/// when the host has to be written back into a URI or `Host` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUri {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl ParsedUri {
    pub fn is_default_port(&self) -> bool {
        self.port == self.scheme.default_port()
    }

    /// Host as it appears inside a URI (IPv6 literals bracket-wrapped).
    pub fn host_for_uri(&self) -> String {
        host_for_uri(&self.host)
    }

    /// `host[:port]`, with the port omitted when it is the scheme default.
    pub fn authority(&self) -> String {
        authority(self.scheme, &self.host, self.port)
    }
}

impl fmt::Display for ParsedUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority(), self.path)
    }
}

/// Bracket-wraps an IPv6 literal so it can be embedded in a URI or `Host` header.
pub(crate) fn host_for_uri(host: &str) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]")
    } else {
        host.to_string()
    }
}

/// Renders `host[:port]`, omitting the port when it equals the scheme default.
pub(crate) fn authority(scheme: Scheme, host: &str, port: u16) -> String {
    let host = host_for_uri(host);
    if port == scheme.default_port() {
        host
    } else {
        format!("{host}:{port}")
    }
}

/// Parses a URI into scheme, host, port and path.
///
/// # Errors
///
/// Returns `ProbeError::InvalidUri` if:
/// - The trimmed input is empty
/// - A scheme is given that is not `http` or `https`
/// - The host is empty
/// - An IPv6 literal is missing its closing bracket
/// - A port is present but is not a number in `1..=65535`
pub fn parse_uri(uri: &str) -> Result<ParsedUri, ProbeError> {
    let uri = uri.trim();
    if uri.is_empty() {
        return Err(ProbeError::InvalidUri("Empty URI".to_string()));
    }

    let (scheme, rest) = match uri.find(SCHEME_MARKER) {
        Some(idx) => (
            uri[..idx].parse::<Scheme>()?,
            &uri[idx + SCHEME_MARKER.len()..],
        ),
        None => (Scheme::Https, uri),
    };

    let (host_port, path) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, ""),
    };

    if host_port.is_empty() {
        return Err(ProbeError::InvalidUri("Missing host".to_string()));
    }

    let (host, port) = split_host_port(host_port)?;
    if host.is_empty() {
        return Err(ProbeError::InvalidUri("Missing host".to_string()));
    }

    Ok(ParsedUri {
        scheme,
        host: host.to_string(),
        port: port.unwrap_or_else(|| scheme.default_port()),
        path: normalize_path(path),
    })
}

/// Splits an authority into host and optional port.
///
/// Bracketed IPv6 literals are recognized before any `:` splitting so their
/// internal colons are never mistaken for a port separator.
fn split_host_port(host_port: &str) -> Result<(&str, Option<u16>), ProbeError> {
    if let Some(bracketed) = host_port.strip_prefix('[') {
        let end = bracketed
            .find(']')
            .ok_or_else(|| ProbeError::InvalidUri("Invalid IPv6 host".to_string()))?;
        let host = &bracketed[..end];
        // Anything after `]` other than `:port` is ignored.
        let port = match bracketed[end + 1..].strip_prefix(':') {
            Some(port) => Some(parse_port(port)?),
            None => None,
        };
        return Ok((host, port));
    }

    match host_port.rsplit_once(':') {
        Some((host, port)) => Ok((host, Some(parse_port(port)?))),
        None => Ok((host_port, None)),
    }
}

fn parse_port(port: &str) -> Result<u16, ProbeError> {
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProbeError::InvalidUri(format!(
            "Invalid port number: {port:?}"
        )));
    }
    match port.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ProbeError::InvalidUri(format!(
            "Port out of range: {port}"
        ))),
    }
}

fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Resolves a `Location` header value against the URI that returned it.
///
/// Absolute `http://` / `https://` locations are returned as-is (trimmed).
/// Anything else is treated as a path on the current origin.
///
/// # Errors
///
/// Returns `ProbeError::InvalidUri` if `current_uri` cannot be parsed.
pub fn resolve_redirect(current_uri: &str, location: &str) -> Result<String, ProbeError> {
    let current = parse_uri(current_uri)?;
    let location = location.trim();

    if location.starts_with("http://") || location.starts_with("https://") {
        return Ok(location.to_string());
    }

    Ok(format!(
        "{}://{}{}",
        current.scheme,
        current.authority(),
        normalize_path(location)
    ))
}
