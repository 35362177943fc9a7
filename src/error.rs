//! Error types for the SDK runtime
//!
//! This module defines the error hierarchy for the entire runtime.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Note that pointer handling deliberately has no error variant: an
//! unparseable pointer is inert (reads absent, writes no-op) rather than an
//! error condition.

use thiserror::Error;

/// The main error type for the SDK runtime
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Transport Errors
    // ============================================================================
    /// Underlying HTTP transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured request timeout elapsed
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed, in milliseconds
        timeout_ms: u64,
    },

    /// A URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Declared API Errors
    // ============================================================================
    /// A non-2xx response classified through the declared error cases
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code of the response
        status: u16,
        /// Rendered reason message
        message: String,
    },

    // ============================================================================
    // Deserialization Errors
    // ============================================================================
    /// A body failed to parse as JSON
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A response could not be decoded into the expected shape
    #[error("Failed to decode response: {message}")]
    Decode {
        /// What failed to decode
        message: String,
    },

    // ============================================================================
    // Iteration Errors
    // ============================================================================
    /// A page was requested past exhaustion
    #[error("No more pages available")]
    NoMorePages,

    /// An item was requested past exhaustion
    #[error("No more items available")]
    NoMoreItems,

    // ============================================================================
    // I/O Errors
    // ============================================================================
    /// Filesystem or stream I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    /// Generic error with a message
    #[error("{0}")]
    Other(String),

    /// Any other error (via anyhow)
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a declared API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a generic error from a message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Check if this error marks the end of iteration rather than a failure
    pub fn is_iteration_end(&self) -> bool {
        matches!(self, Error::NoMorePages | Error::NoMoreItems)
    }

    /// The HTTP status carried by a declared API error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for the SDK runtime
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
