//! Read-only response view
//!
//! [`Response`] is the immutable half of the addressable pair: status code,
//! a case-insensitive header multimap, and the raw body, JSON-parsed lazily
//! on first pointer read. There is no mutation path.

use once_cell::sync::OnceCell;
use reqwest::header::HeaderMap;
use serde_json::Value;

/// One received HTTP response.
#[derive(Debug, Clone, Default)]
pub struct Response {
    status: u16,
    headers: HeaderMap,
    body: String,
    parsed: OnceCell<Option<Value>>,
}

impl Response {
    /// Create a response view from its parts
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
            parsed: OnceCell::new(),
        }
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Header multimap
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Whether a header is present (case-insensitive)
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }

    /// First value of a header (case-insensitive)
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Raw body text
    pub fn text(&self) -> &str {
        &self.body
    }

    /// The body parsed as JSON. Parsed at most once; an unparseable body
    /// yields `None` on every call.
    pub fn json(&self) -> Option<&Value> {
        self.parsed
            .get_or_init(|| serde_json::from_str(&self.body).ok())
            .as_ref()
    }
}
