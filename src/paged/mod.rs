//! Paginated data engine
//!
//! [`PaginatedData`] orchestrates repeated calls through an injected
//! [`CallExecutor`], maintains iteration state, and exposes lazy page/item
//! iteration in both blocking and future-based forms.
//!
//! The engine is one state machine (`NotStarted` → `HasPage` → `Exhausted`)
//! with two thin drivers: `fetch_next_page` blocks on the executor's
//! `execute`, `fetch_next_page_async` awaits `execute_async`, and both feed
//! the same `ingest` transition. Iteration is strictly pull-based: no
//! prefetching, one conceptual fetch in flight per step.
//!
//! Failures are deferred: `has_next_page` triggers the underlying fetch so
//! it can decide termination, but parks any transport or declared-API
//! failure in a pending slot. Only consuming the corresponding page (or
//! item) surfaces the error.

use crate::error::{Error, Result};
use crate::http::CallExecutor;
use crate::pagination::{PageEcho, PageResult, PaginationStrategy};
use crate::request::RequestBuilder;
use crate::response::Response;
use crate::template;
use crate::types::ErrorCases;
use futures::stream::{self, Stream, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

mod iter;

pub use iter::{Items, Pages};

/// Iteration state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    NotStarted,
    HasPage,
    Exhausted,
}

/// Item extractor: pulls the flattened item list out of a decoded body.
pub type Extractor<T> = Arc<dyn Fn(&Value) -> Vec<T> + Send + Sync>;

/// Lazily paginates a list-returning endpoint.
///
/// Holds the builder for the next call (initially the caller's, cloned so
/// the original is never mutated), the most recent response, the ordered
/// strategy list, and the exhaustion state. Owns no network resources; the
/// executor is shared.
pub struct PaginatedData<T> {
    executor: Arc<dyn CallExecutor>,
    request: RequestBuilder,
    strategies: Vec<Arc<dyn PaginationStrategy>>,
    extractor: Extractor<T>,
    page_size: u64,
    error_cases: ErrorCases,
    nullify_404: bool,
    last_response: Option<Response>,
    last_page: Option<PageResult<T>>,
    state: State,
    pending: Option<Result<PageResult<T>>>,
}

impl<T: Clone> PaginatedData<T> {
    /// Create an engine over an executor, an initial request, and an item
    /// extractor.
    pub fn new<F>(executor: Arc<dyn CallExecutor>, request: RequestBuilder, extractor: F) -> Self
    where
        F: Fn(&Value) -> Vec<T> + Send + Sync + 'static,
    {
        Self {
            executor,
            request,
            strategies: Vec::new(),
            extractor: Arc::new(extractor),
            page_size: 0,
            error_cases: ErrorCases::new(),
            nullify_404: false,
            last_response: None,
            last_page: None,
            state: State::NotStarted,
            pending: None,
        }
    }

    /// Append a pagination strategy. Strategies apply in insertion order,
    /// each seeing the builder as mutated by the previous one.
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl PaginationStrategy + 'static) -> Self {
        self.strategies.push(Arc::new(strategy));
        self
    }

    /// Set the page size handed to strategies (used by Offset)
    #[must_use]
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the declared-error case table
    #[must_use]
    pub fn with_error_cases(mut self, cases: ErrorCases) -> Self {
        self.error_cases = cases;
        self
    }

    /// Treat a 404 response as clean exhaustion instead of an error
    #[must_use]
    pub fn with_nullify_404(mut self, nullify: bool) -> Self {
        self.nullify_404 = nullify;
        self
    }

    // ========================================================================
    // Fetch drivers
    // ========================================================================

    /// Execute one call and consume the result into the current page state.
    /// Returns whether a page was obtained. Never executes once exhausted.
    pub fn fetch_next_page(&mut self) -> Result<bool> {
        if self.state == State::Exhausted {
            return Ok(false);
        }
        debug!(url = %self.request.url(), "fetching next page");
        let outcome = self.executor.execute(&self.request);
        self.ingest(outcome)
    }

    /// Async twin of [`fetch_next_page`](Self::fetch_next_page)
    pub async fn fetch_next_page_async(&mut self) -> Result<bool> {
        if self.state == State::Exhausted {
            return Ok(false);
        }
        debug!(url = %self.request.url(), "fetching next page");
        let outcome = self.executor.execute_async(&self.request).await;
        self.ingest(outcome)
    }

    /// Shared state transition for both drivers.
    fn ingest(&mut self, outcome: Result<Response>) -> Result<bool> {
        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "transport failure, ending pagination");
                self.state = State::Exhausted;
                return Err(e);
            }
        };

        if !response.is_success() {
            if response.status() == 404 && self.nullify_404 {
                debug!("404 nullified, ending pagination");
                self.state = State::Exhausted;
                self.last_response = Some(response);
                return Ok(false);
            }
            let error = self.classify(&response);
            warn!(status = response.status(), "declared error, ending pagination");
            self.state = State::Exhausted;
            self.last_response = Some(response);
            return Err(error);
        }

        let body = response.json().cloned().unwrap_or(Value::Null);
        let items = (self.extractor)(&body);
        if items.is_empty() {
            debug!("empty page, ending pagination");
            self.state = State::Exhausted;
            self.last_response = Some(response);
            return Ok(false);
        }

        let mut echo = PageEcho::default();
        for strategy in &self.strategies {
            strategy.echo(&self.request, &response, &mut echo);
        }
        let page = PageResult {
            body,
            items,
            status: response.status(),
            headers: response.headers().clone(),
            echo,
        };

        // Fold the strategies over one evolving builder; no delta across the
        // whole chain means this page is the last one.
        let mut next = self.request.clone();
        for strategy in &self.strategies {
            next = strategy.apply(&next, &response, self.page_size);
        }
        if next == self.request {
            debug!("no strategy advanced the request, last page reached");
            self.state = State::Exhausted;
        } else {
            self.request = next;
            self.state = State::HasPage;
        }

        self.last_response = Some(response);
        self.last_page = Some(page);
        Ok(true)
    }

    fn classify(&self, response: &Response) -> Error {
        let message = match self.error_cases.lookup(response.status()) {
            Some(case) => template::render(&case.template, response),
            None => format!("Unexpected HTTP status {}", response.status()),
        };
        Error::api(response.status(), message)
    }

    // ========================================================================
    // Deferred-failure iteration protocol
    // ========================================================================

    /// Whether another page is obtainable. Triggers the underlying fetch
    /// eagerly but never errors: failures are parked for the matching
    /// [`next_page`](Self::next_page) call.
    pub fn has_next_page(&mut self) -> bool {
        if self.pending.is_some() {
            return true;
        }
        let outcome = self.fetch_next_page();
        self.park(outcome)
    }

    /// Async twin of [`has_next_page`](Self::has_next_page)
    pub async fn has_next_page_async(&mut self) -> bool {
        if self.pending.is_some() {
            return true;
        }
        let outcome = self.fetch_next_page_async().await;
        self.park(outcome)
    }

    fn park(&mut self, outcome: Result<bool>) -> bool {
        match outcome {
            Ok(true) => match self.last_page.clone() {
                Some(page) => {
                    self.pending = Some(Ok(page));
                    true
                }
                None => false,
            },
            Ok(false) => false,
            Err(e) => {
                self.pending = Some(Err(e));
                true
            }
        }
    }

    /// Consume the next page, or the failure deferred while deciding that
    /// it exists. Past exhaustion yields [`Error::NoMorePages`].
    pub fn next_page(&mut self) -> Result<PageResult<T>> {
        if self.has_next_page() {
            self.pending.take().unwrap_or(Err(Error::NoMorePages))
        } else {
            Err(Error::NoMorePages)
        }
    }

    /// Async twin of [`next_page`](Self::next_page)
    pub async fn next_page_async(&mut self) -> Result<PageResult<T>> {
        if self.has_next_page_async().await {
            self.pending.take().unwrap_or(Err(Error::NoMorePages))
        } else {
            Err(Error::NoMorePages)
        }
    }

    // ========================================================================
    // Iteration surfaces
    // ========================================================================

    /// Single-pass, non-restartable blocking page iterator
    pub fn pages(&mut self) -> Pages<'_, T> {
        Pages::new(self)
    }

    /// Blocking page iterator with a caller-supplied page wrapper
    pub fn pages_with<'a, W, F>(&'a mut self, mut wrap: F) -> impl Iterator<Item = Result<W>> + 'a
    where
        F: FnMut(PageResult<T>) -> W + 'a,
    {
        Pages::new(self).map(move |result| result.map(&mut wrap))
    }

    /// Single-pass, non-restartable blocking item iterator, flattened
    /// across pages
    pub fn items(&mut self) -> Items<'_, T> {
        Items::new(self)
    }

    /// Consume the engine into an async stream of pages
    pub fn into_pages(self) -> impl Stream<Item = Result<PageResult<T>>>
    where
        T: 'static,
    {
        stream::unfold(self, |mut data| async move {
            if data.has_next_page_async().await {
                let item = data.pending.take().unwrap_or(Err(Error::NoMorePages));
                Some((item, data))
            } else {
                None
            }
        })
    }

    /// Consume the engine into an async stream of items
    pub fn into_items(self) -> impl Stream<Item = Result<T>>
    where
        T: 'static,
    {
        self.into_pages().flat_map(|result| match result {
            Ok(page) => stream::iter(page.items.into_iter().map(Ok).collect::<Vec<_>>()),
            Err(e) => stream::iter(vec![Err(e)]),
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The last fetched page, without advancing. `None` before any fetch.
    pub fn last_page(&self) -> Option<&PageResult<T>> {
        self.last_page.as_ref()
    }

    /// Items of the last fetched page, without advancing. Empty before any
    /// fetch.
    pub fn last_items(&self) -> Vec<T> {
        self.last_page
            .as_ref()
            .map(|page| page.items.clone())
            .unwrap_or_default()
    }

    /// The most recent response, if any
    pub fn last_response(&self) -> Option<&Response> {
        self.last_response.as_ref()
    }

    /// Whether the engine reached its terminal state
    pub fn is_exhausted(&self) -> bool {
        self.state == State::Exhausted && self.pending.is_none()
    }

    /// The builder that the next fetch would dispatch
    pub fn current_request(&self) -> &RequestBuilder {
        &self.request
    }
}

impl<T> std::fmt::Debug for PaginatedData<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedData")
            .field("request", &self.request)
            .field("strategies", &self.strategies)
            .field("state", &self.state)
            .field("page_size", &self.page_size)
            .field("has_pending", &self.pending.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
