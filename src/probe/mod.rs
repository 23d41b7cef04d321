//! The end-to-end probe.
//!
//! - `alpn`: HTTP/2 support detection through ALPN negotiation
//! - `redirect`: the hop loop that follows 301/302 responses to a final status

mod alpn;
mod redirect;

// Re-export public API
pub use alpn::{detect_http2, probe_http2};
pub use redirect::{follow_redirects, ProbeResult};
