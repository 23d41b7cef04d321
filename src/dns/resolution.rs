//! Host and port resolution to socket addresses.

use std::net::SocketAddr;

use log::debug;

use crate::error_handling::ProbeError;

/// Resolves a host and port to the ordered list of candidate socket addresses.
///
/// IP literals (including unbracketed IPv6) resolve to themselves without a
/// lookup.
///
/// # Errors
///
/// Returns `ProbeError::DnsFailure` if the lookup fails.
pub async fn resolve_addresses(host: &str, port: u16) -> Result<Vec<SocketAddr>, ProbeError> {
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, port))
        .await
        .map_err(|source| ProbeError::DnsFailure {
            host: host.to_string(),
            source,
        })?
        .collect();

    debug!("Resolved {host}:{port} to {} address(es): {addrs:?}", addrs.len());
    Ok(addrs)
}

/// Resolves a host to its distinct IP addresses, in order of first appearance.
///
/// # Errors
///
/// Returns `ProbeError::DnsFailure` if the lookup fails.
pub async fn resolve_ip_strings(host: &str, port: u16) -> Result<Vec<String>, ProbeError> {
    let addrs = resolve_addresses(host, port).await?;
    Ok(distinct_ips(&addrs))
}

pub(crate) fn distinct_ips(addrs: &[SocketAddr]) -> Vec<String> {
    let mut ips: Vec<String> = Vec::with_capacity(addrs.len());
    for addr in addrs {
        let ip = addr.ip().to_string();
        if !ips.contains(&ip) {
            ips.push(ip);
        }
    }
    ips
}
