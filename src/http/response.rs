//! Response draining and header/body splitting.

use std::io;
use std::time::Duration;

use log::debug;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::READ_CHUNK_SIZE;
use crate::error_handling::ProbeError;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Reads from `stream` until the peer closes it or a read times out.
///
/// Requests are sent with `Connection: close`, so a read that stays silent for
/// `timeout` means the server has nothing more to send; it ends the response
/// rather than failing it. A TLS peer that closes without `close_notify` is
/// treated the same as a clean close.
///
/// # Errors
///
/// Returns `ProbeError::ConnectionFailure` for any other read error.
pub async fn read_all<S>(stream: &mut S, timeout: Duration) -> Result<Vec<u8>, ProbeError>
where
    S: AsyncRead + Unpin,
{
    let mut response = Vec::new();
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    loop {
        match tokio::time::timeout(timeout, stream.read(&mut chunk)).await {
            Ok(Ok(0)) => break,
            Ok(Ok(n)) => response.extend_from_slice(&chunk[..n]),
            Ok(Err(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                debug!("Peer closed without close_notify after {} bytes", response.len());
                break;
            }
            Ok(Err(e)) => return Err(ProbeError::from_io("read response", e)),
            Err(_) => {
                debug!(
                    "No data for {}s after {} bytes, treating as end of response",
                    timeout.as_secs_f32(),
                    response.len()
                );
                break;
            }
        }
    }

    Ok(response)
}

/// Splits a raw response at the first blank line into `(headers, body)`.
///
/// Without a blank line the whole input is treated as headers.
pub fn split_headers_body(response: &[u8]) -> (&[u8], &[u8]) {
    match response
        .windows(HEADER_TERMINATOR.len())
        .position(|window| window == HEADER_TERMINATOR)
    {
        Some(idx) => (&response[..idx], &response[idx + HEADER_TERMINATOR.len()..]),
        None => (response, &response[response.len()..]),
    }
}
