// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # sdkcore
//!
//! Shared runtime core consumed by machine-generated REST API client SDKs.
//! Generated endpoint code supplies the wiring (server, path, parameter
//! values, response models); this crate supplies everything that is the same
//! across every endpoint: request construction, dispatch, response
//! classification, and auto-pagination over list-returning endpoints.
//!
//! ## Features
//!
//! - **Addressable requests**: a pointer language (`$request.query#/page`)
//!   that names a location inside an in-flight request or received response
//! - **Pluggable pagination**: Page, Offset, Cursor, and Link strategies
//!   composed over one evolving next-request builder
//! - **Lazy iteration**: pull-based page/item iteration in both blocking and
//!   future-based forms, with failures deferred to the point of consumption
//! - **Declared errors**: non-2xx responses classified through a templated
//!   error-case table (`{$statusCode}`, `{$response.body#/...}`)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sdkcore::http::HttpCallExecutor;
//! use sdkcore::paged::PaginatedData;
//! use sdkcore::pagination::CursorStrategy;
//! use sdkcore::request::RequestBuilder;
//! use std::sync::Arc;
//!
//! let executor = Arc::new(HttpCallExecutor::new());
//! let request = RequestBuilder::get("https://api.example.com", "/v1/items")
//!     .query_param("cursor", "");
//!
//! let mut paged = PaginatedData::new(executor, request, |body| {
//!     body["data"].as_array().cloned().unwrap_or_default()
//! })
//! .with_strategy(CursorStrategy::new(
//!     "$response.body#/next_cursor",
//!     "$request.query#/cursor",
//! ));
//!
//! for item in paged.items() {
//!     let item = item?;
//!     // process item
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Generated SDK code                         │
//! │  builds RequestBuilder, picks strategies, supplies extractor    │
//! └───────────────────────────────┬─────────────────────────────────┘
//!                                 │
//! ┌───────────────────────────────┴─────────────────────────────────┐
//! │                    PaginatedData engine                         │
//! │  fetch → extract items → classify → fold strategies → repeat    │
//! └──────────┬───────────────┬───────────────┬──────────────────────┘
//!            │               │               │
//! ┌──────────┴────┐ ┌────────┴─────┐ ┌───────┴───────┐
//! │ CallExecutor  │ │  Strategies  │ │    Pointer    │
//! │ sync / async  │ │ Page Offset  │ │ read / update │
//! │ (reqwest)     │ │ Cursor Link  │ │               │
//! └───────────────┘ └──────────────┘ └───────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the runtime
pub mod error;

/// Common types and type aliases
pub mod types;

/// Addressable request builder facade
pub mod request;

/// Read-only response view
pub mod response;

/// Pointer language: parse, read, update
pub mod pointer;

/// Pagination strategies
pub mod pagination;

/// Paginated data engine
pub mod paged;

/// API-call executor seam and reqwest-backed implementation
pub mod http;

/// Error-message templating
pub mod template;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use paged::PaginatedData;
pub use pagination::{CursorStrategy, LinkStrategy, OffsetStrategy, PageResult, PageStrategy};
pub use pointer::Pointer;
pub use request::RequestBuilder;
pub use response::Response;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
