//! Status line and header value extraction.
//!
//! Header blocks are raw bytes; they are decoded as ISO-8859-1 so that any
//! byte sequence maps to text without failing.

use crate::config::STATUS_UNAUTHORIZED;

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Returns the status code from the first line of a header block.
///
/// Returns 0 when the status line is missing or malformed.
pub fn status_code(headers: &[u8]) -> u16 {
    let text = decode_latin1(headers);
    text.split("\r\n")
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|code| code.parse::<u16>().ok())
        .unwrap_or(0)
}

/// Returns every value of the named header, in the order the headers appear.
///
/// Names are matched case-insensitively; names and values are trimmed.
pub fn header_values(headers: &[u8], name: &str) -> Vec<String> {
    let text = decode_latin1(headers);
    text.split("\r\n")
        .filter_map(|line| line.split_once(':'))
        .filter(|(header, _)| header.trim().eq_ignore_ascii_case(name))
        .map(|(_, value)| value.trim().to_string())
        .collect()
}

/// Whether the status indicates the resource requires authentication (401).
pub fn is_password_protected(status: u16) -> bool {
    status == STATUS_UNAUTHORIZED
}
