//! Addressable request builder facade
//!
//! [`RequestBuilder`] is the mutable, addressable view of an outgoing
//! request that the pointer resolver operates on: ordered query entries,
//! path/template parameters (value + encode flag), multi-valued headers,
//! and a body that is either a single value or a set of named fields.
//!
//! Builders are plain values. `Clone` produces an independent lineage, so
//! the pagination engine can branch a "next" request without ever mutating
//! the caller's original. `PartialEq` is what lets the engine detect that a
//! strategy produced no advance: the next builder equals the prior one.

use reqwest::Method;
use serde_json::Value;

mod builder;

pub use builder::{Body, RequestBuilder, TemplateParam};

/// Convert a JSON value to its wire string form.
///
/// Strings render without quotes; null renders empty; containers fall back
/// to compact JSON.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Shorthand for a GET builder
pub fn get(server: impl Into<String>, path: impl Into<String>) -> RequestBuilder {
    RequestBuilder::new(Method::GET, server, path)
}

/// Shorthand for a POST builder
pub fn post(server: impl Into<String>, path: impl Into<String>) -> RequestBuilder {
    RequestBuilder::new(Method::POST, server, path)
}
