// Shared test helpers: minimal HTTP/1.1 servers on 127.0.0.1.
//
// The servers speak just enough HTTP for the client: read one request, answer
// with a canned response chosen by request path, close. The TLS variant uses a
// freshly generated self-signed certificate and hands back a root store that
// trusts it.

#![allow(dead_code)] // Not every test file uses every helper

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_rustls::rustls::crypto::ring::default_provider;
use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use tokio_rustls::rustls::{RootCertStore, ServerConfig};
use tokio_rustls::TlsAcceptor;

/// A running canned-response server.
pub struct TestServer {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    /// `http://127.0.0.1:<port>` with no trailing slash.
    pub fn base_uri(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn uri(&self, path: &str) -> String {
        format!("{}{}", self.base_uri(), path)
    }

    /// Raw request heads received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock poisoned").clone()
    }
}

/// Builds a raw HTTP/1.1 response with the given status line and headers.
pub fn response(status_line: &str, headers: &[&str]) -> String {
    let mut raw = format!("{status_line}\r\n");
    for header in headers {
        raw.push_str(header);
        raw.push_str("\r\n");
    }
    raw.push_str("Content-Length: 2\r\n\r\nok");
    raw
}

/// Starts a server answering each path with its canned response (404 otherwise).
///
/// `routes` receives the bound address so responses can carry absolute URIs
/// pointing back at the server.
pub async fn start_server<F>(routes: F) -> TestServer
where
    F: FnOnce(SocketAddr) -> Vec<(&'static str, String)>,
{
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get address");

    let routes: Arc<HashMap<String, String>> = Arc::new(
        routes(addr)
            .into_iter()
            .map(|(path, raw)| (path.to_string(), raw))
            .collect(),
    );
    let requests = Arc::new(Mutex::new(Vec::new()));

    let server_requests = Arc::clone(&requests);
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let routes = Arc::clone(&routes);
            let requests = Arc::clone(&server_requests);
            tokio::spawn(async move {
                let head = read_request_head(&mut socket).await;
                let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                requests
                    .lock()
                    .expect("requests lock poisoned")
                    .push(head);

                let raw = routes
                    .get(&path)
                    .cloned()
                    .unwrap_or_else(|| response("HTTP/1.1 404 Not Found", &[]));
                let _ = socket.write_all(raw.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    TestServer { addr, requests }
}

/// Starts a server that writes `raw` as soon as a client connects, then keeps
/// the connection open for `linger` without closing it.
pub async fn start_lingering_server(raw: &'static [u8], linger: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get address");

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = socket.write_all(raw).await;
                tokio::time::sleep(linger).await;
                drop(socket);
            });
        }
    });

    addr
}

/// Returns the address of a local port with nothing listening on it.
pub fn unused_local_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    listener.local_addr().expect("Failed to get address")
}

/// How the TLS server ends a connection after writing its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsClose {
    /// Send `close_notify`, then shut the socket down
    Notify,
    /// Drop the TCP socket without `close_notify`
    Abrupt,
}

/// A running TLS server with a self-signed certificate.
pub struct TlsTestServer {
    pub addr: SocketAddr,
    /// Trusts exactly this server's certificate
    pub root_store: Arc<RootCertStore>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TlsTestServer {
    pub fn uri(&self, path: &str) -> String {
        format!("https://{}{}", self.addr, path)
    }

    /// Raw request heads received over connections that did not select `h2`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock poisoned").clone()
    }
}

fn self_signed_identity() -> (CertificateDer<'static>, PrivateKeyDer<'static>) {
    let certified =
        rcgen::generate_simple_self_signed(vec!["127.0.0.1".to_string(), "localhost".to_string()])
            .expect("Failed to generate certificate");
    let cert = certified.cert.der().clone();
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(
        certified.signing_key.serialize_der(),
    ));
    (cert, key)
}

/// Starts a TLS server that offers `alpn` (in preference order).
///
/// Connections that select `h2` are closed right after the handshake. Every
/// other connection gets one request read and `raw` written back, then is
/// closed as `close` says.
pub async fn start_tls_server(alpn: &[&[u8]], raw: String, close: TlsClose) -> TlsTestServer {
    let (cert, key) = self_signed_identity();

    let mut root_store = RootCertStore::empty();
    root_store
        .add(cert.clone())
        .expect("Failed to trust test certificate");

    let mut config = ServerConfig::builder_with_provider(Arc::new(default_provider()))
        .with_safe_default_protocol_versions()
        .expect("Failed to select protocol versions")
        .with_no_client_auth()
        .with_single_cert(vec![cert], key)
        .expect("Failed to load test certificate");
    config.alpn_protocols = alpn.iter().map(|p| p.to_vec()).collect();
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get address");

    let requests = Arc::new(Mutex::new(Vec::new()));
    let raw = Arc::new(raw);

    let server_requests = Arc::clone(&requests);
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            let requests = Arc::clone(&server_requests);
            let raw = Arc::clone(&raw);
            tokio::spawn(async move {
                let Ok(mut tls) = acceptor.accept(socket).await else {
                    return;
                };
                if tls.get_ref().1.alpn_protocol() == Some(b"h2".as_slice()) {
                    return;
                }

                let head = read_request_head(&mut tls).await;
                requests.lock().expect("requests lock poisoned").push(head);

                let _ = tls.write_all(raw.as_bytes()).await;
                let _ = tls.flush().await;
                match close {
                    TlsClose::Notify => {
                        let _ = tls.shutdown().await;
                    }
                    TlsClose::Abrupt => {
                        let (tcp, _) = tls.into_inner();
                        drop(tcp);
                    }
                }
            });
        }
    });

    TlsTestServer {
        addr,
        root_store: Arc::new(root_store),
        requests,
    }
}

async fn read_request_head<S>(socket: &mut S) -> String
where
    S: AsyncRead + Unpin,
{
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let read = tokio::time::timeout(Duration::from_secs(2), socket.read(&mut chunk)).await;
        match read {
            Ok(Ok(0)) | Ok(Err(_)) | Err(_) => break,
            Ok(Ok(n)) => {
                head.extend_from_slice(&chunk[..n]);
                if head.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }
    String::from_utf8_lossy(&head).into_owned()
}
