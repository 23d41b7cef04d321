//! TLS client setup.
//!
//! This module builds the TLS configuration for each connection attempt and
//! performs the client handshake:
//! - Mozilla root store from `webpki-roots`, unless the caller supplies its own
//! - `ring` crypto provider passed explicitly (no process-wide default is installed)
//! - ALPN protocol list and SNI target carried by [`TlsSettings`]
//!
//! Uses `tokio-rustls` for async TLS connections.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::crypto::ring::default_provider;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

use crate::config::{ALPN_H2, ALPN_HTTP1};
use crate::error_handling::ProbeError;

/// TLS parameters for one connection attempt.
#[derive(Debug, Clone)]
pub struct TlsSettings {
    /// Host sent as SNI and used for certificate verification
    pub server_name: String,
    /// ALPN protocols offered, in preference order
    pub alpn_protocols: Vec<Vec<u8>>,
    /// Trust anchors; `None` means the bundled `webpki-roots` store
    pub root_store: Option<Arc<RootCertStore>>,
}

impl TlsSettings {
    /// Settings for the main request connection: ALPN `http/1.1` only.
    pub fn http1_only(server_name: &str) -> Self {
        Self {
            server_name: server_name.to_string(),
            alpn_protocols: vec![ALPN_HTTP1.to_vec()],
            root_store: None,
        }
    }

    /// Settings for the HTTP/2 probe: ALPN `h2`, then `http/1.1`.
    pub fn h2_or_http1(server_name: &str) -> Self {
        Self {
            server_name: server_name.to_string(),
            alpn_protocols: vec![ALPN_H2.to_vec(), ALPN_HTTP1.to_vec()],
            root_store: None,
        }
    }

    /// Replaces the trust anchors used to verify the server certificate.
    pub fn with_root_store(mut self, root_store: Option<Arc<RootCertStore>>) -> Self {
        self.root_store = root_store;
        self
    }

    /// Builds the rustls client configuration for these settings.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::TlsFailure` if the crypto provider rejects the
    /// default protocol versions.
    pub fn client_config(&self) -> Result<ClientConfig, ProbeError> {
        let root_store = match &self.root_store {
            Some(store) => Arc::clone(store),
            None => Arc::new(webpki_root_store()),
        };

        let mut config = ClientConfig::builder_with_provider(Arc::new(default_provider()))
            .with_safe_default_protocol_versions()
            .map_err(|e| ProbeError::TlsFailure(format!("TLS configuration error: {e}")))?
            .with_root_certificates(root_store)
            .with_no_client_auth();
        config.alpn_protocols = self.alpn_protocols.clone();
        Ok(config)
    }
}

fn webpki_root_store() -> RootCertStore {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    root_store
}

/// Performs a TLS client handshake over an established TCP stream.
///
/// `addr` is only used for log and error messages.
///
/// # Errors
///
/// - `ProbeError::TlsFailure` if the server name is invalid or the handshake fails
/// - `ProbeError::Timeout` if the handshake does not finish within `timeout`
pub async fn handshake(
    tcp: TcpStream,
    addr: SocketAddr,
    settings: &TlsSettings,
    timeout: Duration,
) -> Result<TlsStream<TcpStream>, ProbeError> {
    let host = settings.server_name.as_str();
    let server_name = ServerName::try_from(host.to_string())
        .map_err(|e| ProbeError::TlsFailure(format!("Invalid server name {host:?}: {e}")))?;

    let connector = TlsConnector::from(Arc::new(settings.client_config()?));
    match tokio::time::timeout(timeout, connector.connect(server_name, tcp)).await {
        Ok(Ok(stream)) => {
            debug!(
                "TLS handshake with {host} ({addr}) complete, ALPN: {:?}",
                negotiated_protocol(&stream).map(String::from_utf8_lossy)
            );
            Ok(stream)
        }
        Ok(Err(e)) => Err(ProbeError::TlsFailure(format!(
            "handshake with {host} ({addr}) failed: {e}"
        ))),
        Err(_) => Err(ProbeError::Timeout(format!(
            "TLS handshake with {host} ({addr}) exceeded {}s",
            timeout.as_secs_f32()
        ))),
    }
}

/// Returns the ALPN protocol the server selected, if any.
pub fn negotiated_protocol(stream: &TlsStream<TcpStream>) -> Option<&[u8]> {
    stream.get_ref().1.alpn_protocol()
}
