//! Error-message templating
//!
//! Declared error reasons may contain `{...}` placeholders drawn from the
//! same vocabulary the pointer resolver uses:
//!
//! - `{$statusCode}`: the response status code
//! - `{$response.header.<name>}`: a response header, case-insensitive
//! - `{$response.body}` / `{$response.body#/<pointer>}`: the parsed body
//!   or a value inside it
//!
//! Rendering is one-directional read-and-substitute and never fails; a
//! placeholder that resolves to nothing renders as the empty string so the
//! final message never leaks raw placeholder syntax.

use crate::pointer::Pointer;
use crate::request::value_to_string;
use crate::response::Response;
use regex::Regex;
use std::sync::LazyLock;

/// Regex for matching `{...}` placeholders
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").unwrap());

/// Render an error-reason template against a response.
pub fn render(template: &str, response: &Response) -> String {
    let mut result = template.to_string();

    for cap in PLACEHOLDER_REGEX.captures_iter(template) {
        let full_match = cap.get(0).unwrap().as_str();
        let token = cap.get(1).unwrap().as_str().trim();
        let replacement = resolve(token, response).unwrap_or_default();
        result = result.replace(full_match, &replacement);
    }

    result
}

/// Check if a string contains placeholders
pub fn has_placeholders(s: &str) -> bool {
    PLACEHOLDER_REGEX.is_match(s)
}

/// Resolve one placeholder token against a response
fn resolve(token: &str, response: &Response) -> Option<String> {
    if token == "$statusCode" {
        return Some(response.status().to_string());
    }

    if let Some(name) = token.strip_prefix("$response.header.") {
        return response.header_value(name).map(str::to_string);
    }

    if token.starts_with("$response.body") {
        let pointer = Pointer::parse(token);
        return pointer.read_response(response).map(|v| value_to_string(&v));
    }

    None
}
