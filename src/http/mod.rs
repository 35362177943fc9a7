//! API-call executor seam and reqwest-backed implementation
//!
//! The pagination engine never talks to the network directly; it drives an
//! injected [`CallExecutor`]. The trait mirrors the two iteration surfaces:
//! a blocking `execute` and a future-returning `execute_async`, both mapping
//! one request builder to one response view. Executors transport only;
//! response classification (declared errors, nullified 404s) happens in the
//! engine.

use crate::error::Result;
use crate::request::RequestBuilder;
use crate::response::Response;
use async_trait::async_trait;

mod client;

pub use client::{HttpCallExecutor, HttpConfig, HttpConfigBuilder};

/// Executes one API call per invocation.
#[async_trait]
pub trait CallExecutor: Send + Sync {
    /// Execute a call, blocking until the round trip completes
    fn execute(&self, request: &RequestBuilder) -> Result<Response>;

    /// Execute a call, completing when the round trip finishes
    async fn execute_async(&self, request: &RequestBuilder) -> Result<Response>;
}
