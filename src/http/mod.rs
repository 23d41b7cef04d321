//! Minimal HTTP/1.1 over a raw stream.
//!
//! This module provides:
//! - Request rendering and sending (`request`)
//! - Response draining and header/body splitting (`response`)
//! - Status line and header value extraction (`headers`)
//! - `Set-Cookie` parsing (`cookies`)

mod cookies;
mod headers;
mod request;
mod response;

// Re-export public API
pub use cookies::{extract_cookies, Cookie};
pub use headers::{header_values, is_password_protected, status_code};
pub use request::{build_request, send_request};
pub use response::{read_all, split_headers_body};
