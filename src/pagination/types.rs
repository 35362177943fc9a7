//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all strategies.

use crate::request::RequestBuilder;
use crate::response::Response;
use reqwest::header::HeaderMap;
use serde_json::Value;

/// Core trait for pagination strategies.
///
/// `apply` always returns a builder; leaving it equal to `prior` signals
/// "no advance". `echo` records the strategy's observed input for the
/// current page: observability only, never control flow.
pub trait PaginationStrategy: Send + Sync + std::fmt::Debug {
    /// Compute the next request from the prior request and response
    fn apply(&self, prior: &RequestBuilder, response: &Response, page_size: u64)
        -> RequestBuilder;

    /// Record this strategy's input echo for the current page
    fn echo(&self, _prior: &RequestBuilder, _response: &Response, _echo: &mut PageEcho) {}
}

/// The pagination inputs observed while producing one page.
///
/// Each field reflects what the active strategy of that kind read from the
/// request/response that produced the page; the numeric fields are `-1`
/// and the strings `None` when that strategy was not active.
#[derive(Debug, Clone, PartialEq)]
pub struct PageEcho {
    /// Cursor token read from the response body
    pub cursor: Option<String>,
    /// Next-link URL read from the response body
    pub next_link: Option<String>,
    /// Page number read from the request
    pub page_number: i64,
    /// Offset read from the request
    pub offset: i64,
}

impl Default for PageEcho {
    fn default() -> Self {
        Self {
            cursor: None,
            next_link: None,
            page_number: -1,
            offset: -1,
        }
    }
}

/// One fetched page: the decoded body, the items extracted from it, the
/// response status and headers, and the input echoes.
#[derive(Debug, Clone)]
pub struct PageResult<T> {
    /// Deserialized response body
    pub body: Value,
    /// Items extracted by the caller-supplied extractor
    pub items: Vec<T>,
    /// HTTP status code of the response
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Strategy input echoes
    pub echo: PageEcho,
}

impl<T> PageResult<T> {
    /// Number of items extracted from this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the extractor yielded no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Interpret a value as an integer numeral, remembering whether it was
/// encoded as text. Non-numeric values (including text like `"5a"`) are not
/// numerals.
pub(crate) fn as_numeral(value: &Value) -> Option<(i64, bool)> {
    match value {
        Value::Number(n) => n.as_i64().map(|i| (i, false)),
        Value::String(s) => s.parse::<i64>().ok().map(|i| (i, true)),
        _ => None,
    }
}

/// Encode an integer back in the form it was read in
pub(crate) fn numeral_value(n: i64, as_text: bool) -> Value {
    if as_text {
        Value::String(n.to_string())
    } else {
        Value::Number(n.into())
    }
}
