//! Pointer language: parse, read, update
//!
//! A pointer names a location inside an in-flight request or a received
//! response: `$request.query#/page`, `$response.body#/results/0/id`.
//!
//! The grammar is deliberately small; this is not a general JSON-Pointer
//! implementation. Supported roots are the six containers the SDK runtime
//! addresses; path segments are object/map keys or non-negative array
//! indexes. An unparseable or unsupported pointer is permanently inert:
//! every read yields absent and every update is a no-op. Nothing here ever
//! returns an error.

use crate::request::{value_to_string, Body, RequestBuilder};
use crate::response::Response;
use serde_json::{Map, Value};

/// Addressable root containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Root {
    /// Query parameters of the outgoing request
    RequestQuery,
    /// Path/template parameters of the outgoing request
    RequestPath,
    /// Headers of the outgoing request
    RequestHeaders,
    /// Body of the outgoing request
    RequestBody,
    /// Parsed body of the received response
    ResponseBody,
    /// Headers of the received response
    ResponseHeaders,
}

impl Root {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "request.query" => Some(Self::RequestQuery),
            "request.path" => Some(Self::RequestPath),
            "request.headers" => Some(Self::RequestHeaders),
            "request.body" => Some(Self::RequestBody),
            "response.body" => Some(Self::ResponseBody),
            "response.headers" => Some(Self::ResponseHeaders),
            _ => None,
        }
    }

    /// Whether this root addresses the outgoing request
    pub fn is_request(self) -> bool {
        matches!(
            self,
            Self::RequestQuery | Self::RequestPath | Self::RequestHeaders | Self::RequestBody
        )
    }
}

/// One navigation step: a map key or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object field or map key
    Key(String),
    /// Non-negative array index
    Index(usize),
}

impl Segment {
    fn parse(s: &str) -> Self {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            match s.parse::<usize>() {
                Ok(i) => Self::Index(i),
                Err(_) => Self::Key(s.to_string()),
            }
        } else {
            Self::Key(s.to_string())
        }
    }

    fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(k) => Some(k),
            Self::Index(_) => None,
        }
    }
}

/// A parsed pointer: root selector plus navigation path.
///
/// `Pointer::parse` never fails; bad input produces an inert pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointer {
    target: Option<(Root, Vec<Segment>)>,
}

impl Pointer {
    /// Parse a pointer string of the form `$<root>` or
    /// `$<root>#/<segment>/<segment>...`.
    pub fn parse(input: &str) -> Self {
        Self {
            target: parse_target(input),
        }
    }

    /// An inert pointer: reads absent, updates no-op
    pub fn inert() -> Self {
        Self { target: None }
    }

    /// Whether this pointer failed to parse and is permanently inert
    pub fn is_inert(&self) -> bool {
        self.target.is_none()
    }

    /// The root selector, if the pointer parsed
    pub fn root(&self) -> Option<Root> {
        self.target.as_ref().map(|(root, _)| *root)
    }

    // ========================================================================
    // Read
    // ========================================================================

    /// Read the addressed value from a request builder snapshot.
    ///
    /// Response-rooted and inert pointers yield `None`, as does any
    /// navigation step through an absent, null, or incompatible value.
    pub fn read_request(&self, builder: &RequestBuilder) -> Option<Value> {
        let (root, path) = self.target.as_ref()?;
        match root {
            Root::RequestQuery => {
                let (first, rest) = path.split_first()?;
                let value = builder.query_value(first.as_key()?)?;
                navigate(value, rest).cloned()
            }
            Root::RequestPath => {
                let (first, rest) = path.split_first()?;
                let value = builder.template_value(first.as_key()?)?;
                navigate(value, rest).cloned()
            }
            Root::RequestHeaders => {
                let (first, rest) = path.split_first()?;
                if !rest.is_empty() {
                    return None;
                }
                builder
                    .header_value(first.as_key()?)
                    .map(|v| Value::String(v.to_string()))
            }
            Root::RequestBody => match builder.body_ref() {
                Body::Value(value) => navigate(value, path).cloned(),
                Body::Fields(map) => {
                    let (first, rest) = path.split_first()?;
                    let value = map.get(first.as_key()?)?;
                    navigate(value, rest).cloned()
                }
                Body::Empty => None,
            },
            Root::ResponseBody | Root::ResponseHeaders => None,
        }
    }

    /// Read the addressed value from a response.
    ///
    /// Header keys match case-insensitively; the body is JSON-parsed lazily
    /// on first read. Request-rooted and inert pointers yield `None`.
    pub fn read_response(&self, response: &Response) -> Option<Value> {
        let (root, path) = self.target.as_ref()?;
        match root {
            Root::ResponseBody => navigate(response.json()?, path).cloned(),
            Root::ResponseHeaders => {
                let (first, rest) = path.split_first()?;
                if !rest.is_empty() {
                    return None;
                }
                response
                    .header_value(first.as_key()?)
                    .map(|v| Value::String(v.to_string()))
            }
            _ => None,
        }
    }

    // ========================================================================
    // Update
    // ========================================================================

    /// Apply `f` to the addressed value inside a request builder and write
    /// the result back, preserving the container shape.
    ///
    /// `f` receives the current value, or `None` when the target is absent.
    /// It is invoked even for absent targets so strategies can observe
    /// absence; a `None` (or null) result means no write. The update never
    /// invents new top-level parameters: when the pointer's first segment
    /// names nothing in the builder, the builder comes back unchanged.
    /// Intermediate containers are only created below a parameter that
    /// already exists.
    pub fn update<F>(&self, mut builder: RequestBuilder, f: F) -> RequestBuilder
    where
        F: FnOnce(Option<&Value>) -> Option<Value>,
    {
        let Some((root, path)) = self.target.as_ref() else {
            return builder;
        };

        match root {
            Root::RequestQuery => {
                let Some((key, rest)) = split_key(path) else {
                    return builder;
                };
                match builder.query_value(key).cloned() {
                    Some(current) => {
                        if let Some(updated) = apply_at(&current, rest, f) {
                            builder.replace_query_value(key, updated);
                        }
                    }
                    None => {
                        f(None);
                    }
                }
            }
            Root::RequestPath => {
                let Some((key, rest)) = split_key(path) else {
                    return builder;
                };
                match builder.template_value(key).cloned() {
                    Some(current) => {
                        if let Some(updated) = apply_at(&current, rest, f) {
                            builder.replace_template_value(key, updated);
                        }
                    }
                    None => {
                        f(None);
                    }
                }
            }
            Root::RequestHeaders => {
                let Some((key, rest)) = split_key(path) else {
                    return builder;
                };
                if !rest.is_empty() {
                    return builder;
                }
                match builder.header_value(key).map(|v| Value::String(v.to_string())) {
                    Some(current) => {
                        if let Some(updated) = apply_at(&current, &[], f) {
                            builder.replace_header_value(key, value_to_string(&updated));
                        }
                    }
                    None => {
                        f(None);
                    }
                }
            }
            Root::RequestBody => match builder.body_ref().clone() {
                Body::Value(current) => {
                    if let Some(updated) = apply_at(&current, path, f) {
                        builder.replace_body_value(updated);
                    }
                }
                Body::Fields(map) => {
                    let Some((key, rest)) = split_key(path) else {
                        return builder;
                    };
                    match map.get(key) {
                        Some(current) => {
                            if let Some(updated) = apply_at(current, rest, f) {
                                builder.replace_body_field(key, updated);
                            }
                        }
                        None => {
                            f(None);
                        }
                    }
                }
                Body::Empty => {
                    f(None);
                }
            },
            Root::ResponseBody | Root::ResponseHeaders => {}
        }

        builder
    }
}

impl std::str::FromStr for Pointer {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

fn parse_target(input: &str) -> Option<(Root, Vec<Segment>)> {
    let rest = input.strip_prefix('$')?;

    let (root_str, path) = match rest.split_once('#') {
        Some((root_str, fragment)) => {
            let fragment = fragment.strip_prefix('/')?;
            let path = if fragment.is_empty() {
                Vec::new()
            } else {
                let parts: Vec<&str> = fragment.split('/').collect();
                if parts.iter().any(|p| p.is_empty()) {
                    return None;
                }
                parts.into_iter().map(Segment::parse).collect()
            };
            (root_str, path)
        }
        None => (rest, Vec::new()),
    };

    Root::parse(root_str).map(|root| (root, path))
}

fn split_key(path: &[Segment]) -> Option<(&str, &[Segment])> {
    let (first, rest) = path.split_first()?;
    Some((first.as_key()?, rest))
}

/// Walk a navigation path through a JSON value. Stops at the first absent,
/// null, or type-incompatible intermediate.
fn navigate<'a>(value: &'a Value, path: &[Segment]) -> Option<&'a Value> {
    let mut current = value;
    for segment in path {
        current = match (current, segment) {
            (Value::Object(map), Segment::Key(key)) => map.get(key)?,
            (Value::Array(arr), Segment::Index(idx)) => arr.get(*idx)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Apply `f` at `path` inside `current`, returning the rewritten top-level
/// value when a write happened.
fn apply_at<F>(current: &Value, path: &[Segment], f: F) -> Option<Value>
where
    F: FnOnce(Option<&Value>) -> Option<Value>,
{
    let existing = navigate(current, path);
    let new_value = f(existing)?;
    if new_value.is_null() {
        return None;
    }

    let mut updated = current.clone();
    if write_at(&mut updated, path, new_value) {
        Some(updated)
    } else {
        None
    }
}

/// Write a value at `path` inside `slot`. Missing object keys below an
/// existing parameter are created; array indexes must already exist.
fn write_at(slot: &mut Value, path: &[Segment], new_value: Value) -> bool {
    match path.split_first() {
        None => {
            *slot = new_value;
            true
        }
        Some((Segment::Key(key), rest)) => {
            if slot.is_null() {
                *slot = Value::Object(Map::new());
            }
            let Some(map) = slot.as_object_mut() else {
                return false;
            };
            let child = map.entry(key.clone()).or_insert(Value::Null);
            write_at(child, rest, new_value)
        }
        Some((Segment::Index(idx), rest)) => {
            let Some(arr) = slot.as_array_mut() else {
                return false;
            };
            let Some(child) = arr.get_mut(*idx) else {
                return false;
            };
            write_at(child, rest, new_value)
        }
    }
}

#[cfg(test)]
mod tests;
