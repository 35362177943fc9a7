//! Tests for the paginated data engine

use super::*;
use crate::http::CallExecutor;
use crate::pagination::{CursorStrategy, LinkStrategy, OffsetStrategy, PageStrategy};
use crate::request::RequestBuilder;
use crate::response::Response;
use async_trait::async_trait;
use futures::StreamExt;
use pretty_assertions::assert_eq;
use reqwest::header::HeaderMap;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// ============================================================================
// Scripted executor
// ============================================================================

/// Plays back a fixed script of responses and records every request.
#[derive(Debug, Default)]
struct ScriptedExecutor {
    script: Mutex<VecDeque<Result<Response>>>,
    calls: Mutex<Vec<RequestBuilder>>,
}

impl ScriptedExecutor {
    fn new(script: Vec<Result<Response>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn ok(bodies: &[&str]) -> Arc<Self> {
        Self::new(
            bodies
                .iter()
                .map(|b| Ok(Response::new(200, HeaderMap::new(), *b)))
                .collect(),
        )
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn call(&self, index: usize) -> RequestBuilder {
        self.calls.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl CallExecutor for ScriptedExecutor {
    fn execute(&self, request: &RequestBuilder) -> Result<Response> {
        self.calls.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Response::new(200, HeaderMap::new(), "{}")))
    }

    async fn execute_async(&self, request: &RequestBuilder) -> Result<Response> {
        self.execute(request)
    }
}

fn extract_data(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn engine(
    executor: Arc<ScriptedExecutor>,
    request: RequestBuilder,
) -> PaginatedData<String> {
    PaginatedData::new(executor, request, extract_data)
}

// ============================================================================
// End-to-end link scenario
// ============================================================================

#[test]
fn test_link_pagination_end_to_end() {
    let executor = ScriptedExecutor::ok(&[
        r#"{"data":["apple","mango","orange"],"next_link":"https://api.example.com/fruits?page=2"}"#,
        r#"{"data":["potato","carrot","tomato"],"next_link":"https://api.example.com/fruits?page=3"}"#,
        r#"{"data":[]}"#,
    ]);
    let request = RequestBuilder::get("https://api.example.com", "/fruits");

    let mut paged = engine(executor.clone(), request)
        .with_strategy(LinkStrategy::new("$response.body#/next_link"));

    let items: Vec<String> = paged.items().map(|i| i.unwrap()).collect();
    assert_eq!(
        items,
        vec!["apple", "mango", "orange", "potato", "carrot", "tomato"]
    );

    assert_eq!(executor.call_count(), 3);
    assert!(executor.call(0).query_value("page").is_none());
    assert_eq!(executor.call(1).query_value("page"), Some(&json!("2")));
    assert_eq!(executor.call(2).query_value("page"), Some(&json!("3")));
    assert!(paged.is_exhausted());
}

#[test]
fn test_link_pagination_pages() {
    let executor = ScriptedExecutor::ok(&[
        r#"{"data":["apple","mango","orange"],"next_link":"https://api.example.com/fruits?page=2"}"#,
        r#"{"data":["potato","carrot","tomato"],"next_link":"https://api.example.com/fruits?page=3"}"#,
        r#"{"data":[]}"#,
    ]);
    let request = RequestBuilder::get("https://api.example.com", "/fruits");

    let mut paged = engine(executor, request)
        .with_strategy(LinkStrategy::new("$response.body#/next_link"));

    let mut pages = paged.pages();
    let first = pages.next().unwrap().unwrap();
    assert_eq!(first.len(), 3);
    assert_eq!(
        first.echo.next_link.as_deref(),
        Some("https://api.example.com/fruits?page=2")
    );

    let second = pages.next().unwrap().unwrap();
    assert_eq!(second.items, vec!["potato", "carrot", "tomato"]);

    assert!(pages.next().is_none());
    assert!(matches!(pages.next_page(), Err(Error::NoMorePages)));
}

// ============================================================================
// Exhaustion
// ============================================================================

#[test]
fn test_exhaustion_on_empty_first_page() {
    let executor = ScriptedExecutor::ok(&[r#"{"data":[]}"#]);
    let mut paged = engine(executor, RequestBuilder::get("https://s", "/items"));

    assert!(!paged.has_next_page());
    assert!(matches!(paged.next_page(), Err(Error::NoMorePages)));
    assert!(paged.last_page().is_none());
    assert!(paged.is_exhausted());
}

#[test]
fn test_no_more_items_past_exhaustion() {
    let executor = ScriptedExecutor::ok(&[r#"{"data":["only"]}"#]);
    let mut paged = engine(executor, RequestBuilder::get("https://s", "/items"));

    let mut items = paged.items();
    assert_eq!(items.next_item().unwrap(), "only");
    assert!(!items.has_next());
    assert!(matches!(items.next_item(), Err(Error::NoMoreItems)));
}

#[test]
fn test_no_strategies_single_page() {
    let executor = ScriptedExecutor::ok(&[r#"{"data":["a","b"]}"#, r#"{"data":["c"]}"#]);
    let mut paged = engine(executor.clone(), RequestBuilder::get("https://s", "/items"));

    let pages: Vec<_> = paged.pages().map(|p| p.unwrap()).collect();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].items, vec!["a", "b"]);
    // No strategy advanced the request, so the second scripted response is
    // never fetched.
    assert_eq!(executor.call_count(), 1);
}

#[test]
fn test_no_advance_when_cursor_repeats() {
    let executor = ScriptedExecutor::ok(&[
        r#"{"data":["x"],"next_cursor":"abc"}"#,
        r#"{"data":["y"],"next_cursor":"abc"}"#,
    ]);
    let request = RequestBuilder::get("https://s", "/items").query_param("cursor", "");

    let mut paged = engine(executor.clone(), request)
        .with_strategy(CursorStrategy::new(
            "$response.body#/next_cursor",
            "$request.query#/cursor",
        ));

    let items: Vec<String> = paged.items().map(|i| i.unwrap()).collect();
    assert_eq!(items, vec!["x", "y"]);
    assert_eq!(executor.call_count(), 2);
    assert_eq!(executor.call(1).query_value("cursor"), Some(&json!("abc")));
}

#[test]
fn test_never_executes_once_exhausted() {
    let executor = ScriptedExecutor::ok(&[r#"{"data":[]}"#]);
    let mut paged = engine(executor.clone(), RequestBuilder::get("https://s", "/items"));

    assert_eq!(paged.fetch_next_page().unwrap(), false);
    assert_eq!(paged.fetch_next_page().unwrap(), false);
    assert_eq!(paged.fetch_next_page().unwrap(), false);
    assert_eq!(executor.call_count(), 1);
}

// ============================================================================
// Offset and cursor flows
// ============================================================================

#[test]
fn test_offset_flow_advances_by_page_size() {
    let executor = ScriptedExecutor::ok(&[
        r#"{"data":["a","b"]}"#,
        r#"{"data":["c","d"]}"#,
        r#"{"data":[]}"#,
    ]);
    let request = RequestBuilder::get("https://s", "/items").query_param("offset", 0);

    let mut paged = engine(executor.clone(), request)
        .with_strategy(OffsetStrategy::new("$request.query#/offset"))
        .with_page_size(2);

    let items: Vec<String> = paged.items().map(|i| i.unwrap()).collect();
    assert_eq!(items, vec!["a", "b", "c", "d"]);
    assert_eq!(executor.call(0).query_value("offset"), Some(&json!(0)));
    assert_eq!(executor.call(1).query_value("offset"), Some(&json!(2)));
    assert_eq!(executor.call(2).query_value("offset"), Some(&json!(4)));
}

#[test]
fn test_cursor_echo_on_page_result() {
    let executor = ScriptedExecutor::ok(&[r#"{"data":["x"],"next_cursor":"tok-1"}"#]);
    let request = RequestBuilder::get("https://s", "/items").query_param("cursor", "");

    let mut paged = engine(executor, request).with_strategy(CursorStrategy::new(
        "$response.body#/next_cursor",
        "$request.query#/cursor",
    ));

    let page = paged.next_page().unwrap();
    assert_eq!(page.echo.cursor.as_deref(), Some("tok-1"));
    assert_eq!(page.echo.page_number, -1);
    assert_eq!(page.echo.offset, -1);
    assert!(page.echo.next_link.is_none());
}

#[test]
fn test_composed_strategies_see_prior_mutations() {
    // Link rewrites page to "7"; Page then increments the rewritten value.
    let executor = ScriptedExecutor::ok(&[
        r#"{"data":["a"],"next":"https://api.example.com/items?page=7"}"#,
        r#"{"data":[]}"#,
    ]);
    let request = RequestBuilder::get("https://s", "/items").query_param("page", 1);

    let mut paged = engine(executor.clone(), request)
        .with_strategy(LinkStrategy::new("$response.body#/next"))
        .with_strategy(PageStrategy::new("$request.query#/page"));

    let _: Vec<_> = paged.items().collect();
    assert_eq!(executor.call(1).query_value("page"), Some(&json!("8")));
}

// ============================================================================
// Deferred failures
// ============================================================================

#[test]
fn test_declared_error_is_deferred() {
    let executor = ScriptedExecutor::new(vec![Ok(Response::new(
        404,
        HeaderMap::new(),
        r#"{"message":"no such fruit"}"#,
    ))]);
    let request = RequestBuilder::get("https://s", "/fruits");

    let mut paged = engine(executor.clone(), request).with_error_cases(
        crate::types::ErrorCases::new()
            .on_default("server said {$statusCode}: {$response.body#/message}"),
    );

    // Deciding has-more never throws
    assert!(paged.has_next_page());
    assert_eq!(executor.call_count(), 1);

    // Consuming the page surfaces the declared error exactly once
    let err = paged.next_page().unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "server said 404: no such fruit");
        }
        other => panic!("expected Api error, got {other:?}"),
    }

    // Afterwards iteration is cleanly over, with no further calls
    assert!(!paged.has_next_page());
    assert!(matches!(paged.next_page(), Err(Error::NoMorePages)));
    assert_eq!(executor.call_count(), 1);
}

#[test]
fn test_declared_error_through_iterator() {
    let executor = ScriptedExecutor::new(vec![Ok(Response::new(500, HeaderMap::new(), "{}"))]);
    let mut paged = engine(executor, RequestBuilder::get("https://s", "/items"));

    let results: Vec<_> = paged.pages().collect();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].as_ref().unwrap_err().status(), Some(500));
}

#[test]
fn test_nullified_404_is_clean_exhaustion() {
    let executor = ScriptedExecutor::new(vec![Ok(Response::new(404, HeaderMap::new(), ""))]);
    let request = RequestBuilder::get("https://s", "/fruits");

    let mut paged = engine(executor, request)
        .with_error_cases(crate::types::ErrorCases::new().on_default("boom"))
        .with_nullify_404(true);

    assert!(!paged.has_next_page());
    assert!(paged.is_exhausted());
}

#[test]
fn test_transport_error_is_deferred() {
    let executor = ScriptedExecutor::new(vec![Err(Error::other("connection refused"))]);
    let mut paged = engine(executor, RequestBuilder::get("https://s", "/items"));

    let mut items = paged.items();
    assert!(items.has_next());
    let err = items.next_item().unwrap_err();
    assert!(err.to_string().contains("connection refused"));
    assert!(!items.has_next());
}

// ============================================================================
// Accessors
// ============================================================================

#[test]
fn test_last_page_accessors() {
    let executor = ScriptedExecutor::ok(&[r#"{"data":["a","b"]}"#]);
    let mut paged = engine(executor, RequestBuilder::get("https://s", "/items"));

    assert!(paged.last_page().is_none());
    assert!(paged.last_items().is_empty());
    assert!(paged.last_response().is_none());

    assert!(paged.fetch_next_page().unwrap());
    assert_eq!(paged.last_items(), vec!["a", "b"]);
    assert_eq!(paged.last_page().unwrap().status, 200);
    assert_eq!(paged.last_response().unwrap().status(), 200);

    // Accessors do not advance
    assert_eq!(paged.last_items(), vec!["a", "b"]);
}

#[test]
fn test_pages_with_wrapper() {
    let executor = ScriptedExecutor::ok(&[r#"{"data":["a","b"]}"#]);
    let mut paged = engine(executor, RequestBuilder::get("https://s", "/items"));

    let sizes: Vec<usize> = paged
        .pages_with(|page| page.len())
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(sizes, vec![2]);
}

// ============================================================================
// Async drivers
// ============================================================================

#[tokio::test]
async fn test_fetch_next_page_async() {
    let executor = ScriptedExecutor::ok(&[
        r#"{"data":["a"],"next_cursor":"n1"}"#,
        r#"{"data":[]}"#,
    ]);
    let request = RequestBuilder::get("https://s", "/items").query_param("cursor", "");

    let mut paged = engine(executor, request).with_strategy(CursorStrategy::new(
        "$response.body#/next_cursor",
        "$request.query#/cursor",
    ));

    assert!(paged.fetch_next_page_async().await.unwrap());
    assert_eq!(paged.last_items(), vec!["a"]);
    assert!(!paged.fetch_next_page_async().await.unwrap());
}

#[tokio::test]
async fn test_into_pages_stream() {
    let executor = ScriptedExecutor::ok(&[
        r#"{"data":["a","b"],"next":"https://s/items?page=2"}"#,
        r#"{"data":["c"],"next":null}"#,
    ]);
    let request = RequestBuilder::get("https://s", "/items");

    let paged = engine(executor, request)
        .with_strategy(LinkStrategy::new("$response.body#/next"));

    let pages: Vec<_> = paged.into_pages().collect().await;
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].as_ref().unwrap().items, vec!["a", "b"]);
    assert_eq!(pages[1].as_ref().unwrap().items, vec!["c"]);
}

#[tokio::test]
async fn test_into_items_stream() {
    let executor = ScriptedExecutor::ok(&[
        r#"{"data":["apple","mango"],"next":"https://s/items?page=2"}"#,
        r#"{"data":["potato"],"next":null}"#,
    ]);
    let request = RequestBuilder::get("https://s", "/items");

    let paged = engine(executor, request)
        .with_strategy(LinkStrategy::new("$response.body#/next"));

    let items: Vec<String> = paged
        .into_items()
        .map(|i| i.unwrap())
        .collect()
        .await;
    assert_eq!(items, vec!["apple", "mango", "potato"]);
}
