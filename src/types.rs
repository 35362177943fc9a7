//! Common types used throughout the SDK runtime
//!
//! Shared type aliases plus the declared-error case table that classifies
//! non-2xx responses into templated API errors.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Declared Error Cases
// ============================================================================

/// One declared error case: a reason template rendered against the response
/// that triggered it.
///
/// The template may contain `{...}` placeholders from the shared pointer
/// vocabulary: `{$statusCode}`, `{$response.header.<name>}`,
/// `{$response.body#/<pointer>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCase {
    /// Reason template for the error message
    pub template: String,
}

impl ErrorCase {
    /// Create an error case from a reason template
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

/// Table of declared error cases keyed by status code.
///
/// Lookup tries the exact status (`"404"`) first, then the `"default"` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCases {
    cases: HashMap<String, ErrorCase>,
}

impl ErrorCases {
    /// Create an empty case table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a case for an exact status code
    #[must_use]
    pub fn on_status(mut self, status: u16, template: impl Into<String>) -> Self {
        self.cases
            .insert(status.to_string(), ErrorCase::new(template));
        self
    }

    /// Register the fallback case for any unmatched non-2xx status
    #[must_use]
    pub fn on_default(mut self, template: impl Into<String>) -> Self {
        self.cases
            .insert("default".to_string(), ErrorCase::new(template));
        self
    }

    /// Look up the case for a status code, falling back to the default case
    pub fn lookup(&self, status: u16) -> Option<&ErrorCase> {
        self.cases
            .get(&status.to_string())
            .or_else(|| self.cases.get("default"))
    }

    /// Whether the table has no cases at all
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}
