//! Connection establishment with per-address fallback.
//!
//! A host can resolve to several addresses (typically IPv6 and IPv4). Each is
//! tried in resolver order; a failed candidate is dropped (closing its socket)
//! before the next one is attempted, and only the last failure is reported.

mod stream;

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use log::debug;
use tokio::net::TcpStream;

use crate::config::ProbeOptions;
use crate::dns::resolve_addresses;
use crate::error_handling::ProbeError;
use crate::tls::{self, TlsSettings};
use crate::uri::Scheme;

pub use stream::Connection;

/// Opens a connection to `host:port`, wrapped in TLS for `https`.
///
/// TLS connections offer ALPN `http/1.1` only, send `host` as SNI and trust
/// `options.root_store` (the bundled roots when unset). Every socket step is
/// bounded by `options.timeout`.
///
/// # Errors
///
/// - `ProbeError::DnsFailure` if the host cannot be resolved
/// - `ProbeError::ConnectionFailure` with `"no route"` if resolution yields no addresses
/// - The last candidate's failure (`ConnectionFailure`, `TlsFailure` or `Timeout`)
///   if every address fails
pub async fn connect(
    scheme: Scheme,
    host: &str,
    port: u16,
    options: &ProbeOptions,
) -> Result<Connection, ProbeError> {
    let addrs = resolve_addresses(host, port).await?;
    let timeout = options.timeout;
    let settings = TlsSettings::http1_only(host).with_root_store(options.root_store.clone());
    let settings = &settings;

    try_candidates(&addrs, move |addr| async move {
        let tcp = connect_tcp(addr, timeout).await?;
        if scheme.is_tls() {
            let stream = tls::handshake(tcp, addr, settings, timeout).await?;
            Ok(Connection::Tls(Box::new(stream)))
        } else {
            Ok(Connection::Plain(tcp))
        }
    })
    .await
}

/// Opens a TCP connection to a single address, bounded by `timeout`.
pub async fn connect_tcp(addr: SocketAddr, timeout: Duration) -> Result<TcpStream, ProbeError> {
    let context = format!("connect to {addr}");
    match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(e)) => Err(ProbeError::from_io(&context, e)),
        Err(_) => Err(ProbeError::Timeout(context)),
    }
}

/// Runs `attempt` against each address in order and returns the first success.
///
/// Whatever `attempt` opened is dropped when it fails, so no socket outlives
/// its candidate.
///
/// # Errors
///
/// Returns the error of the last candidate, or `ConnectionFailure("no route")`
/// when `addrs` is empty.
pub(crate) async fn try_candidates<T, F, Fut>(
    addrs: &[SocketAddr],
    mut attempt: F,
) -> Result<T, ProbeError>
where
    F: FnMut(SocketAddr) -> Fut,
    Fut: Future<Output = Result<T, ProbeError>>,
{
    let mut last_error = None;
    for &addr in addrs {
        match attempt(addr).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                debug!("Connection attempt to {addr} failed: {e}");
                last_error = Some(e);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| ProbeError::ConnectionFailure("no route".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::ErrorCategory;

    fn addrs(list: &[&str]) -> Vec<SocketAddr> {
        list.iter().map(|a| a.parse().unwrap()).collect()
    }

    #[tokio::test]
    async fn test_try_candidates_no_addresses_is_no_route() {
        let result: Result<(), ProbeError> =
            try_candidates(&[], |_| async { Ok(()) }).await;
        match result {
            Err(ProbeError::ConnectionFailure(detail)) => assert_eq!(detail, "no route"),
            other => panic!("expected no route failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_try_candidates_falls_back_in_order() {
        let candidates = addrs(&["10.0.0.1:443", "10.0.0.2:443", "10.0.0.3:443"]);
        let mut tried = Vec::new();
        let result = try_candidates(&candidates, |addr| {
            tried.push(addr);
            async move {
                if addr.ip().to_string() == "10.0.0.2" {
                    Ok(addr)
                } else {
                    Err(ProbeError::ConnectionFailure(format!("refused by {addr}")))
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), candidates[1]);
        assert_eq!(tried, candidates[..2].to_vec());
    }

    #[tokio::test]
    async fn test_try_candidates_reports_last_failure() {
        let candidates = addrs(&["10.0.0.1:443", "10.0.0.2:443"]);
        let result: Result<(), ProbeError> = try_candidates(&candidates, |addr| async move {
            if addr.ip().to_string() == "10.0.0.1" {
                Err(ProbeError::ConnectionFailure("refused".to_string()))
            } else {
                Err(ProbeError::Timeout(format!("connect to {addr}")))
            }
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Timeout);
        assert_eq!(err.to_string(), "Connection timeout: connect to 10.0.0.2:443");
    }

    #[tokio::test]
    async fn test_connect_tcp_refused_is_connection_failure() {
        // Bind then drop a listener to get a local port with nothing listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = connect_tcp(addr, Duration::from_secs(5)).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ConnectionFailure);
    }
}
