//! Tests for the pointer resolver

use super::*;
use crate::request::RequestBuilder;
use crate::response::Response;
use pretty_assertions::assert_eq;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::json;
use test_case::test_case;

fn sample_request() -> RequestBuilder {
    RequestBuilder::get("https://api.example.com", "/users/{id}")
        .query_param("page", 3)
        .query_param("filter", json!({"status": "active", "tags": ["a", "b"]}))
        .template_param("id", "u-7", false)
        .header_param("X-Cursor", "abc")
        .body_param("offset", "5")
}

fn sample_response() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert("content-type", HeaderValue::from_static("application/json"));
    Response::new(
        200,
        headers,
        r#"{"next_cursor":"xyz123","meta":{"pages":[10,20,30]},"gone":null}"#,
    )
}

// ============================================================================
// Parsing
// ============================================================================

#[test_case("$request.query#/page", Some(Root::RequestQuery); "query root")]
#[test_case("$request.path#/id", Some(Root::RequestPath); "path root")]
#[test_case("$request.headers#/X-Cursor", Some(Root::RequestHeaders); "headers root")]
#[test_case("$request.body#/offset", Some(Root::RequestBody); "body root")]
#[test_case("$response.body#/next", Some(Root::ResponseBody); "response body root")]
#[test_case("$response.headers#/Link", Some(Root::ResponseHeaders); "response headers root")]
#[test_case("$response.body", Some(Root::ResponseBody); "root only")]
#[test_case("request.query#/page", None; "missing dollar")]
#[test_case("$request.cookies#/sid", None; "unsupported root")]
#[test_case("$request.query#page", None; "fragment without slash")]
#[test_case("$request.query#/a//b", None; "empty segment")]
#[test_case("", None; "empty string")]
fn test_parse(input: &str, root: Option<Root>) {
    let pointer = Pointer::parse(input);
    assert_eq!(pointer.root(), root);
    assert_eq!(pointer.is_inert(), root.is_none());
}

#[test]
fn test_parse_numeric_segment() {
    let pointer = Pointer::parse("$response.body#/meta/pages/1");
    assert!(!pointer.is_inert());

    let value = pointer.read_response(&sample_response());
    assert_eq!(value, Some(json!(20)));
}

// ============================================================================
// Reads
// ============================================================================

#[test]
fn test_read_request_roots() {
    let request = sample_request();

    assert_eq!(
        Pointer::parse("$request.query#/page").read_request(&request),
        Some(json!(3))
    );
    assert_eq!(
        Pointer::parse("$request.query#/filter/status").read_request(&request),
        Some(json!("active"))
    );
    assert_eq!(
        Pointer::parse("$request.query#/filter/tags/1").read_request(&request),
        Some(json!("b"))
    );
    assert_eq!(
        Pointer::parse("$request.path#/id").read_request(&request),
        Some(json!("u-7"))
    );
    assert_eq!(
        Pointer::parse("$request.headers#/x-cursor").read_request(&request),
        Some(json!("abc"))
    );
    assert_eq!(
        Pointer::parse("$request.body#/offset").read_request(&request),
        Some(json!("5"))
    );
}

#[test]
fn test_read_absent_is_none() {
    let request = sample_request();

    assert_eq!(
        Pointer::parse("$request.query#/missing").read_request(&request),
        None
    );
    // Navigating through a scalar stops without error
    assert_eq!(
        Pointer::parse("$request.query#/page/deeper").read_request(&request),
        None
    );
    // Index out of range
    assert_eq!(
        Pointer::parse("$request.query#/filter/tags/9").read_request(&request),
        None
    );
    // Inert pointer reads absent
    assert_eq!(Pointer::inert().read_request(&request), None);
    // Response root against a request reads absent
    assert_eq!(
        Pointer::parse("$response.body#/x").read_request(&request),
        None
    );
}

#[test]
fn test_read_response_roots() {
    let response = sample_response();

    assert_eq!(
        Pointer::parse("$response.body#/next_cursor").read_response(&response),
        Some(json!("xyz123"))
    );
    assert_eq!(
        Pointer::parse("$response.body#/meta/pages/0").read_response(&response),
        Some(json!(10))
    );
    assert_eq!(
        Pointer::parse("$response.headers#/Content-Type").read_response(&response),
        Some(json!("application/json"))
    );
    // Whole body
    let whole = Pointer::parse("$response.body").read_response(&response);
    assert_eq!(whole.unwrap()["next_cursor"], json!("xyz123"));
}

#[test]
fn test_present_null_is_distinct_from_absent() {
    let response = sample_response();

    // "gone" is present with a null value
    assert_eq!(
        Pointer::parse("$response.body#/gone").read_response(&response),
        Some(json!(null))
    );
    // but navigating through it is absent
    assert_eq!(
        Pointer::parse("$response.body#/gone/deeper").read_response(&response),
        None
    );
    assert_eq!(
        Pointer::parse("$response.body#/absent").read_response(&response),
        None
    );
}

// ============================================================================
// Updates
// ============================================================================

#[test]
fn test_update_replaces_in_place() {
    let request = sample_request();

    let next = Pointer::parse("$request.query#/page").update(request.clone(), |v| {
        let n = v.and_then(serde_json::Value::as_i64).unwrap();
        Some(json!(n + 1))
    });

    assert_eq!(next.query_value("page"), Some(&json!(4)));
    // Original untouched, everything else preserved
    assert_eq!(request.query_value("page"), Some(&json!(3)));
    assert_eq!(next.query_value("filter"), request.query_value("filter"));
}

#[test]
fn test_update_nested_preserves_container() {
    let request = sample_request();

    let next = Pointer::parse("$request.query#/filter/tags/0")
        .update(request, |_| Some(json!("z")));

    assert_eq!(
        next.query_value("filter"),
        Some(&json!({"status": "active", "tags": ["z", "b"]}))
    );
}

#[test]
fn test_update_absent_param_never_invents() {
    let request = sample_request();
    let mut saw_absent = false;

    let next = Pointer::parse("$request.query#/cursor").update(request.clone(), |v| {
        saw_absent = v.is_none();
        Some(json!("should-not-appear"))
    });

    assert!(saw_absent, "closure must still be invoked on absence");
    assert_eq!(next, request);
    assert!(next.query_value("cursor").is_none());
}

#[test]
fn test_update_none_result_means_no_write() {
    let request = sample_request();

    let next = Pointer::parse("$request.query#/page").update(request.clone(), |_| None);
    assert_eq!(next, request);

    let next = Pointer::parse("$request.query#/page").update(request.clone(), |_| Some(json!(null)));
    assert_eq!(next, request);
}

#[test]
fn test_update_creates_intermediate_below_existing_param() {
    let request = RequestBuilder::get("https://s", "/").query_param("filter", json!({}));

    let next = Pointer::parse("$request.query#/filter/page").update(request, |v| {
        assert!(v.is_none());
        Some(json!(2))
    });

    assert_eq!(next.query_value("filter"), Some(&json!({"page": 2})));
}

#[test]
fn test_update_header_and_body_roots() {
    let request = sample_request();

    let next = Pointer::parse("$request.headers#/X-Cursor")
        .update(request.clone(), |_| Some(json!("def")));
    assert_eq!(next.header_value("x-cursor"), Some("def"));

    let next = Pointer::parse("$request.body#/offset").update(request, |v| {
        assert_eq!(v, Some(&json!("5")));
        Some(json!("105"))
    });
    assert_eq!(
        Pointer::parse("$request.body#/offset").read_request(&next),
        Some(json!("105"))
    );
}

#[test]
fn test_update_inert_and_response_roots_are_noops() {
    let request = sample_request();

    let next = Pointer::inert().update(request.clone(), |_| Some(json!(1)));
    assert_eq!(next, request);

    let next = Pointer::parse("$response.body#/x").update(request.clone(), |_| Some(json!(1)));
    assert_eq!(next, request);
}

#[test]
fn test_update_numeral_text_stays_text() {
    let request = RequestBuilder::get("https://s", "/").query_param("offset", "5");

    let next = Pointer::parse("$request.query#/offset").update(request, |v| {
        match v {
            Some(serde_json::Value::String(s)) => {
                let n: i64 = s.parse().ok()?;
                Some(json!((n + 100).to_string()))
            }
            _ => None,
        }
    });

    assert_eq!(next.query_value("offset"), Some(&json!("105")));
}
