//! HTTP/2 support detection.
//!
//! Support is inferred from the TLS handshake alone: a dedicated connection
//! offers `h2` and `http/1.1` and the server's ALPN choice is inspected. No
//! HTTP/2 frames are ever exchanged.

use log::debug;

use crate::config::{ProbeOptions, ALPN_H2};
use crate::connection::{connect_tcp, try_candidates};
use crate::dns::resolve_addresses;
use crate::error_handling::ProbeError;
use crate::tls::{self, TlsSettings};

/// Opens a throwaway TLS connection and reports whether the server selected `h2`.
///
/// Candidate addresses are tried in resolver order; the first one that
/// completes the handshake decides the answer.
///
/// # Errors
///
/// Returns the last candidate's failure if no address completes a handshake,
/// or `ProbeError::DnsFailure` if the host cannot be resolved.
pub async fn probe_http2(
    host: &str,
    port: u16,
    options: &ProbeOptions,
) -> Result<bool, ProbeError> {
    let addrs = resolve_addresses(host, port).await?;
    let timeout = options.timeout;
    let settings = TlsSettings::h2_or_http1(host).with_root_store(options.root_store.clone());
    let settings = &settings;

    try_candidates(&addrs, move |addr| async move {
        let tcp = connect_tcp(addr, timeout).await?;
        let stream = tls::handshake(tcp, addr, settings, timeout).await?;
        let supported = selects_h2(tls::negotiated_protocol(&stream));
        Ok(supported)
    })
    .await
}

/// Best-effort variant of [`probe_http2`].
///
/// Returns `None` when support could not be determined; the failure is logged
/// and never propagated.
pub async fn detect_http2(host: &str, port: u16, options: &ProbeOptions) -> Option<bool> {
    match probe_http2(host, port, options).await {
        Ok(supported) => {
            debug!("HTTP/2 probe for {host}:{port}: supported={supported}");
            Some(supported)
        }
        Err(e) => {
            debug!("HTTP/2 probe for {host}:{port} undetermined: {e}");
            None
        }
    }
}

fn selects_h2(negotiated: Option<&[u8]>) -> bool {
    negotiated == Some(ALPN_H2)
}
