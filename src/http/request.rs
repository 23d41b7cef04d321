//! Request rendering and sending.

use std::fmt::Write as _;
use std::time::Duration;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::config::USER_AGENT;
use crate::error_handling::ProbeError;
use crate::uri::{authority, Scheme};

/// Renders the GET request sent on every hop.
///
/// The `Host` header bracket-wraps IPv6 hosts and carries the port only when it
/// differs from the scheme default. Non-ASCII bytes in the path are
/// percent-encoded so the request line stays ASCII.
pub fn build_request(host: &str, port: u16, path: &str, scheme: Scheme) -> Vec<u8> {
    format!(
        "GET {} HTTP/1.1\r\n\
         Host: {}\r\n\
         Connection: close\r\n\
         User-Agent: {USER_AGENT}\r\n\
         Accept: */*\r\n\
         \r\n",
        ascii_path(path),
        authority(scheme, host, port),
    )
    .into_bytes()
}

fn ascii_path(path: &str) -> String {
    if path.is_ascii() {
        return path.to_string();
    }
    let mut encoded = String::with_capacity(path.len() * 3);
    for byte in path.bytes() {
        if byte.is_ascii() {
            encoded.push(byte as char);
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}

/// Writes the full request and flushes it, bounded by `timeout`.
///
/// # Errors
///
/// - `ProbeError::Timeout` if the write does not complete in time
/// - `ProbeError::ConnectionFailure` on any other write error
pub async fn send_request<S>(
    stream: &mut S,
    request: &[u8],
    timeout: Duration,
) -> Result<(), ProbeError>
where
    S: AsyncWrite + Unpin,
{
    let write = async {
        stream.write_all(request).await?;
        stream.flush().await
    };
    match tokio::time::timeout(timeout, write).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(ProbeError::from_io("send request", e)),
        Err(_) => Err(ProbeError::Timeout("send request".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uri::parse_uri;
    use tokio::io::AsyncReadExt;

    fn host_header(request: &[u8]) -> String {
        let text = String::from_utf8(request.to_vec()).unwrap();
        text.lines()
            .find_map(|line| line.strip_prefix("Host: "))
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_build_request_exact_bytes() {
        let request = build_request("example.com", 443, "/index.html", Scheme::Https);
        assert_eq!(
            request,
            b"GET /index.html HTTP/1.1\r\n\
              Host: example.com\r\n\
              Connection: close\r\n\
              User-Agent: WebTester/1.0\r\n\
              Accept: */*\r\n\
              \r\n"
                .to_vec()
        );
    }

    #[test]
    fn test_host_header_includes_non_default_port() {
        let request = build_request("example.com", 8080, "/", Scheme::Http);
        assert_eq!(host_header(&request), "example.com:8080");
    }

    #[test]
    fn test_host_header_port_is_relative_to_scheme() {
        assert_eq!(
            host_header(&build_request("a.com", 443, "/", Scheme::Http)),
            "a.com:443"
        );
        assert_eq!(
            host_header(&build_request("a.com", 80, "/", Scheme::Https)),
            "a.com:80"
        );
    }

    #[test]
    fn test_host_header_brackets_ipv6() {
        assert_eq!(
            host_header(&build_request("::1", 80, "/", Scheme::Http)),
            "[::1]"
        );
        assert_eq!(
            host_header(&build_request("2001:db8::1", 8443, "/", Scheme::Https)),
            "[2001:db8::1]:8443"
        );
    }

    #[test]
    fn test_parsed_uri_renders_expected_host_header() {
        let cases = [
            ("http://example.com", "example.com"),
            ("http://example.com:80/a", "example.com"),
            ("http://example.com:8080/a", "example.com:8080"),
            ("https://example.com:443", "example.com"),
            ("https://example.com:8443/", "example.com:8443"),
            ("example.com", "example.com"),
            ("http://[::1]:8080/x", "[::1]:8080"),
        ];
        for (uri, expected) in cases {
            let parsed = parse_uri(uri).unwrap();
            let request = build_request(&parsed.host, parsed.port, &parsed.path, parsed.scheme);
            assert_eq!(host_header(&request), expected, "Host header for {uri}");
        }
    }

    #[test]
    fn test_non_ascii_path_is_percent_encoded() {
        let request = build_request("a.com", 443, "/caf\u{e9}", Scheme::Https);
        let text = String::from_utf8(request).unwrap();
        assert!(text.starts_with("GET /caf%C3%A9 HTTP/1.1\r\n"));
    }

    #[tokio::test]
    async fn test_send_request_writes_all_bytes() {
        let (mut client, mut server) = tokio::io::duplex(1024);
        let request = build_request("example.com", 443, "/", Scheme::Https);

        send_request(&mut client, &request, Duration::from_secs(1))
            .await
            .unwrap();
        drop(client);

        let mut received = Vec::new();
        server.read_to_end(&mut received).await.unwrap();
        assert_eq!(received, request);
    }
}
