//! The request builder value type

use super::value_to_string;
use reqwest::Method;
use serde_json::{Map, Value};
use url::form_urlencoded;

/// Request body: absent, a single value, or one or more named fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Body {
    /// No body
    #[default]
    Empty,
    /// A single serialized value
    Value(Value),
    /// Named body fields, serialized as one JSON object
    Fields(Map<String, Value>),
}

impl Body {
    /// Render the body as a JSON value, if any
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Body::Empty => None,
            Body::Value(v) => Some(v.clone()),
            Body::Fields(map) => Some(Value::Object(map.clone())),
        }
    }
}

/// A path/template parameter: the value plus whether it should be
/// percent-encoded when rendered into the path.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateParam {
    /// Parameter value
    pub value: Value,
    /// Percent-encode when substituting into the path
    pub encode: bool,
}

/// The addressable state of one outgoing request.
///
/// Created per call attempt by generated endpoint code. The pagination
/// engine always takes a `clone()` before mutating, so the caller's builder
/// is never touched.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBuilder {
    method: Method,
    server: String,
    path: String,
    query: Vec<(String, Value)>,
    template: Vec<(String, TemplateParam)>,
    headers: Vec<(String, String)>,
    body: Body,
}

impl RequestBuilder {
    /// Create a builder for the given method, server base URL, and path
    /// template (`/users/{id}` style placeholders).
    pub fn new(method: Method, server: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method,
            server: server.into(),
            path: path.into(),
            query: Vec::new(),
            template: Vec::new(),
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    /// Shorthand for a GET builder
    pub fn get(server: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(Method::GET, server, path)
    }

    /// Shorthand for a POST builder
    pub fn post(server: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(Method::POST, server, path)
    }

    // ========================================================================
    // Chained setters (generated-code surface)
    // ========================================================================

    /// Add a query parameter. Repeated keys keep both entries.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a path/template parameter
    #[must_use]
    pub fn template_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
        encode: bool,
    ) -> Self {
        self.template.push((
            key.into(),
            TemplateParam {
                value: value.into(),
                encode,
            },
        ));
        self
    }

    /// Add a header. Repeated keys produce a multi-valued header.
    #[must_use]
    pub fn header_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Set the body to a single value, replacing any named fields
    #[must_use]
    pub fn body(mut self, value: impl Into<Value>) -> Self {
        self.body = Body::Value(value.into());
        self
    }

    /// Add a named body field. Replaces a scalar body with a field map.
    #[must_use]
    pub fn body_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        match &mut self.body {
            Body::Fields(map) => {
                map.insert(name.into(), value.into());
            }
            _ => {
                let mut map = Map::new();
                map.insert(name.into(), value.into());
                self.body = Body::Fields(map);
            }
        }
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// HTTP method
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Server base URL
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Raw path template
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Ordered query entries
    pub fn query_entries(&self) -> &[(String, Value)] {
        &self.query
    }

    /// First query value for a key
    pub fn query_value(&self, key: &str) -> Option<&Value> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Template parameter for a key
    pub fn template_value(&self, key: &str) -> Option<&Value> {
        self.template
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, p)| &p.value)
    }

    /// All header values for a key, matched case-insensitively
    pub fn header_values(&self, key: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// First header value for a key, matched case-insensitively
    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.header_values(key).into_iter().next()
    }

    /// All headers in insertion order
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// The request body
    pub fn body_ref(&self) -> &Body {
        &self.body
    }

    // ========================================================================
    // Replace-in-place surface (pointer resolver)
    // ========================================================================

    /// Replace the value of an existing query entry. Returns false when the
    /// key is not present; never inserts.
    pub fn replace_query_value(&mut self, key: &str, value: Value) -> bool {
        if let Some(slot) = self.query.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value;
            true
        } else {
            false
        }
    }

    /// Replace the value of an existing template parameter
    pub fn replace_template_value(&mut self, key: &str, value: Value) -> bool {
        if let Some(slot) = self.template.iter_mut().find(|(k, _)| k == key) {
            slot.1.value = value;
            true
        } else {
            false
        }
    }

    /// Replace the first header matching the key (case-insensitive)
    pub fn replace_header_value(&mut self, key: &str, value: String) -> bool {
        if let Some(slot) = self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
        {
            slot.1 = value;
            true
        } else {
            false
        }
    }

    /// Replace a scalar body. Returns false when the body is empty or holds
    /// named fields.
    pub fn replace_body_value(&mut self, value: Value) -> bool {
        match &mut self.body {
            Body::Value(slot) => {
                *slot = value;
                true
            }
            _ => false,
        }
    }

    /// Replace an existing named body field
    pub fn replace_body_field(&mut self, name: &str, value: Value) -> bool {
        match &mut self.body {
            Body::Fields(map) if map.contains_key(name) => {
                map.insert(name.to_string(), value);
                true
            }
            _ => false,
        }
    }

    /// Insert or replace a query entry.
    ///
    /// This is the one write path allowed to invent new parameters; it
    /// exists for Link pagination, which replays an opaque server-chosen
    /// query string onto the next request.
    pub fn upsert_query(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if !self.replace_query_value(&key, value.clone()) {
            self.query.push((key, value));
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Render the full URL: server joined with the path template, with
    /// `{name}` placeholders substituted (percent-encoded when the
    /// parameter's encode flag is set). Query parameters are not included.
    pub fn url(&self) -> String {
        let mut path = self.path.clone();
        for (key, param) in &self.template {
            let raw = value_to_string(&param.value);
            let rendered: String = if param.encode {
                form_urlencoded::byte_serialize(raw.as_bytes()).collect()
            } else {
                raw
            };
            path = path.replace(&format!("{{{key}}}"), &rendered);
        }

        let base = self.server.trim_end_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path.trim_start_matches('/'))
        }
    }

    /// Query entries rendered as wire strings, in insertion order
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query
            .iter()
            .map(|(k, v)| (k.clone(), value_to_string(v)))
            .collect()
    }
}
