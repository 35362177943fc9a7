//! Pagination strategies
//!
//! Supports: Page, Offset, Cursor, Link
//!
//! # Overview
//!
//! Each strategy implements one contract: given the prior request and the
//! prior response, produce the builder for the next request. "No advance"
//! is signaled by returning the builder unchanged; the engine detects this
//! as builder equality, so every strategy is safe to re-apply when its
//! source pointer is absent or unparseable.
//!
//! Strategies compose: the engine folds them in order over one evolving
//! builder, each against the same prior response, so later strategies see
//! the mutations of earlier ones.

mod strategies;
mod types;

pub use strategies::{CursorStrategy, LinkStrategy, OffsetStrategy, PageStrategy};
pub use types::{PageEcho, PageResult, PaginationStrategy};
