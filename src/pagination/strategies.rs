//! Pagination strategy implementations
//!
//! Each strategy handles a specific pagination pattern.

use super::types::{as_numeral, numeral_value, PageEcho, PaginationStrategy};
use crate::pointer::Pointer;
use crate::request::{value_to_string, RequestBuilder};
use crate::response::Response;
use serde_json::Value;
use url::Url;

// ============================================================================
// Page Pagination
// ============================================================================

/// Page-number pagination (e.g., traditional web pagination)
///
/// Reads the current page number through a request pointer, increments it
/// by one, and writes it back into the next request. Common patterns:
/// - `?page=2`
/// - a `Page` header or path segment
///
/// A missing or non-numeric page value means no advance.
#[derive(Debug, Clone)]
pub struct PageStrategy {
    /// Pointer to the page number inside the request
    pub request_pointer: Pointer,
}

impl PageStrategy {
    /// Create a page strategy from a request pointer string
    pub fn new(request_pointer: &str) -> Self {
        Self {
            request_pointer: Pointer::parse(request_pointer),
        }
    }
}

impl PaginationStrategy for PageStrategy {
    fn apply(
        &self,
        prior: &RequestBuilder,
        _response: &Response,
        _page_size: u64,
    ) -> RequestBuilder {
        self.request_pointer.update(prior.clone(), |value| {
            let (n, as_text) = as_numeral(value?)?;
            Some(numeral_value(n + 1, as_text))
        })
    }

    fn echo(&self, prior: &RequestBuilder, _response: &Response, echo: &mut PageEcho) {
        if let Some((n, _)) = self.request_pointer.read_request(prior).as_ref().and_then(as_numeral)
        {
            echo.page_number = n;
        }
    }
}

// ============================================================================
// Offset Pagination
// ============================================================================

/// Offset-based pagination (e.g., SQL-style pagination)
///
/// Reads the current offset through a request pointer, adds the page size,
/// and writes it back. Common patterns:
/// - `?offset=100&limit=50`
/// - `?skip=100&take=50`
///
/// Numeral-as-text offsets (`"5"`) stay text; non-numeric text (`"5a"`) is
/// left untouched.
#[derive(Debug, Clone)]
pub struct OffsetStrategy {
    /// Pointer to the offset inside the request
    pub request_pointer: Pointer,
}

impl OffsetStrategy {
    /// Create an offset strategy from a request pointer string
    pub fn new(request_pointer: &str) -> Self {
        Self {
            request_pointer: Pointer::parse(request_pointer),
        }
    }
}

impl PaginationStrategy for OffsetStrategy {
    fn apply(
        &self,
        prior: &RequestBuilder,
        _response: &Response,
        page_size: u64,
    ) -> RequestBuilder {
        self.request_pointer.update(prior.clone(), |value| {
            let (n, as_text) = as_numeral(value?)?;
            Some(numeral_value(n + page_size as i64, as_text))
        })
    }

    fn echo(&self, prior: &RequestBuilder, _response: &Response, echo: &mut PageEcho) {
        if let Some((n, _)) = self.request_pointer.read_request(prior).as_ref().and_then(as_numeral)
        {
            echo.offset = n;
        }
    }
}

// ============================================================================
// Cursor Pagination
// ============================================================================

/// Cursor-based pagination (e.g., Stripe, Slack)
///
/// Reads an opaque cursor token through a response pointer and writes it
/// into the next request through a request pointer. Common patterns:
/// - `{"next_cursor": "abc123"}` → `?cursor=abc123`
/// - `?starting_after=obj_123`
///
/// An absent or empty token means no write.
#[derive(Debug, Clone)]
pub struct CursorStrategy {
    /// Pointer to the cursor token inside the response
    pub response_pointer: Pointer,
    /// Pointer to the cursor parameter inside the request
    pub request_pointer: Pointer,
}

impl CursorStrategy {
    /// Create a cursor strategy from response and request pointer strings
    pub fn new(response_pointer: &str, request_pointer: &str) -> Self {
        Self {
            response_pointer: Pointer::parse(response_pointer),
            request_pointer: Pointer::parse(request_pointer),
        }
    }

    fn token(&self, response: &Response) -> Option<String> {
        let value = self.response_pointer.read_response(response)?;
        let token = value_to_string(&value);
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }
}

impl PaginationStrategy for CursorStrategy {
    fn apply(
        &self,
        prior: &RequestBuilder,
        response: &Response,
        _page_size: u64,
    ) -> RequestBuilder {
        let Some(token) = self.token(response) else {
            return prior.clone();
        };
        self.request_pointer
            .update(prior.clone(), |_| Some(Value::String(token)))
    }

    fn echo(&self, _prior: &RequestBuilder, response: &Response, echo: &mut PageEcho) {
        echo.cursor = self.token(response);
    }
}

// ============================================================================
// Link Pagination
// ============================================================================

/// Next-link pagination (full URL in the response body)
///
/// Reads a complete URL through a response pointer, decomposes its query
/// string, and writes each `key=value` pair into the query section of the
/// next request. Common patterns:
/// - `{"next": "https://api.example.com/items?page=2"}`
/// - `{"pagination": {"next_url": "..."}}`
///
/// Keys absent from the prior request are inserted; this is the one place the
/// runtime invents new parameters, because the whole point of link
/// pagination is replaying a server-chosen query string. A malformed or
/// absent URL means no advance.
#[derive(Debug, Clone)]
pub struct LinkStrategy {
    /// Pointer to the next-link URL inside the response
    pub response_pointer: Pointer,
}

impl LinkStrategy {
    /// Create a link strategy from a response pointer string
    pub fn new(response_pointer: &str) -> Self {
        Self {
            response_pointer: Pointer::parse(response_pointer),
        }
    }

    fn link(&self, response: &Response) -> Option<String> {
        let value = self.response_pointer.read_response(response)?;
        match value {
            Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

impl PaginationStrategy for LinkStrategy {
    fn apply(
        &self,
        prior: &RequestBuilder,
        response: &Response,
        _page_size: u64,
    ) -> RequestBuilder {
        let Some(link) = self.link(response) else {
            return prior.clone();
        };
        let Ok(url) = Url::parse(&link) else {
            return prior.clone();
        };

        let mut next = prior.clone();
        for (key, value) in url.query_pairs() {
            next.upsert_query(key.to_string(), Value::String(value.to_string()));
        }
        next
    }

    fn echo(&self, _prior: &RequestBuilder, response: &Response, echo: &mut PageEcho) {
        echo.next_link = self.link(response);
    }
}
