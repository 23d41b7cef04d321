//! Redirect chain resolution.
//!
//! Each hop runs the HTTP/2 probe (https only), sends one GET and reads the
//! response headers. 301 and 302 responses with a `Location` header are
//! followed; any other outcome ends the run. A URI seen twice in the same run
//! is a redirect loop.

use std::collections::HashSet;

use log::{debug, info, warn};

use crate::config::{ProbeOptions, HEADER_LOCATION, REDIRECT_STATUSES};
use crate::connection::connect;
use crate::error_handling::ProbeError;
use crate::http::{
    build_request, header_values, read_all, send_request, split_headers_body, status_code,
};
use crate::probe::alpn::detect_http2;
use crate::uri::{parse_uri, resolve_redirect, ParsedUri};

/// Outcome of a completed probe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// URI of the last hop
    pub final_uri: String,
    /// Header block of the last response (status line included, no trailing blank line)
    pub raw_headers: Vec<u8>,
    /// Status of the last response; 0 if its status line was malformed
    pub status_code: u16,
    /// Whether any probed hop negotiated `h2`
    pub http2_supported: bool,
    /// Number of redirects followed
    pub redirect_count: usize,
}

/// Follows the redirect chain starting at `initial_uri` until a final response.
///
/// # Arguments
///
/// * `initial_uri` - The URI to start from
/// * `options` - Socket timeout, optional redirect ceiling and TLS trust anchors
///
/// # Errors
///
/// - `ProbeError::RedirectLoop` if a hop resolves to an already visited URI
/// - `ProbeError::TooManyRedirects` if `options.max_redirects` would be exceeded
/// - Any URI, DNS, connection, TLS or timeout failure of a hop's main request.
///   A failed HTTP/2 probe is not an error.
pub async fn follow_redirects(
    initial_uri: &str,
    options: &ProbeOptions,
) -> Result<ProbeResult, ProbeError> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut current = initial_uri.to_string();
    let mut http2_supported = false;
    let mut redirect_count = 0usize;

    loop {
        if !visited.insert(current.clone()) {
            return Err(ProbeError::RedirectLoop(current));
        }

        let uri = parse_uri(&current)?;
        info!("Requesting {current}");

        // Once a hop negotiates h2 the answer stays "yes" for the run.
        if uri.scheme.is_tls()
            && detect_http2(&uri.host, uri.port, options).await == Some(true)
        {
            http2_supported = true;
        }

        let raw_headers = fetch_headers(&uri, options).await?;
        let status = status_code(&raw_headers);
        debug!("{current} responded with status {status}");

        if REDIRECT_STATUSES.contains(&status) {
            match header_values(&raw_headers, HEADER_LOCATION).into_iter().next() {
                Some(location) => {
                    if let Some(max) = options.max_redirects {
                        if redirect_count >= max {
                            return Err(ProbeError::TooManyRedirects(max));
                        }
                    }
                    let next = resolve_redirect(&current, &location)?;
                    info!("Redirect {status}: {current} -> {next}");
                    current = next;
                    redirect_count += 1;
                    continue;
                }
                None => {
                    warn!("Redirect status {status} for {current} but no Location header");
                }
            }
        }

        return Ok(ProbeResult {
            final_uri: current,
            raw_headers,
            status_code: status,
            http2_supported,
            redirect_count,
        });
    }
}

/// Performs one hop: connect, send the GET, drain the response, keep the headers.
///
/// The connection is dropped before returning.
async fn fetch_headers(uri: &ParsedUri, options: &ProbeOptions) -> Result<Vec<u8>, ProbeError> {
    let timeout = options.timeout;
    let request = build_request(&uri.host, uri.port, &uri.path, uri.scheme);

    let mut connection = connect(uri.scheme, &uri.host, uri.port, options).await?;
    debug!(
        "Connected to {}:{} (tls: {})",
        uri.host,
        uri.port,
        connection.is_tls()
    );
    send_request(&mut connection, &request, timeout).await?;
    let response = read_all(&mut connection, timeout).await?;
    drop(connection);

    let (headers, body) = split_headers_body(&response);
    debug!(
        "Read {} header bytes and {} body bytes",
        headers.len(),
        body.len()
    );
    Ok(headers.to_vec())
}
