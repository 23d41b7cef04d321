//! `Set-Cookie` parsing.
//!
//! Only the cookie name and its `Expires` / `Domain` attributes are kept; the
//! probe reports cookies, it never stores or replays them.

use crate::config::HEADER_SET_COOKIE;
use crate::http::headers::header_values;

/// A cookie issued by the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub expires: Option<String>,
    pub domain: Option<String>,
}

impl Cookie {
    /// Parses one `Set-Cookie` header value.
    ///
    /// Returns `None` when the first segment has no `=` or an empty name.
    pub fn from_set_cookie(value: &str) -> Option<Self> {
        let mut segments = value.split(';');
        let (name, _) = segments.next()?.trim().split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = Cookie {
            name: name.to_string(),
            expires: None,
            domain: None,
        };
        for attribute in segments {
            let Some((key, value)) = attribute.trim().split_once('=') else {
                continue;
            };
            let value = value.trim().to_string();
            match key.trim().to_ascii_lowercase().as_str() {
                "expires" => cookie.expires = Some(value),
                "domain" => cookie.domain = Some(value),
                _ => {}
            }
        }
        Some(cookie)
    }
}

/// Extracts every well-formed cookie from the `Set-Cookie` headers, in order.
///
/// Malformed entries are skipped.
pub fn extract_cookies(headers: &[u8]) -> Vec<Cookie> {
    header_values(headers, HEADER_SET_COOKIE)
        .iter()
        .filter_map(|value| Cookie::from_set_cookie(value))
        .collect()
}
