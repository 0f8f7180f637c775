//! Integration tests for `BestBuyClient`.
//!
//! These tests drive the client through `MockTransport` and verify the
//! query transaction: dispatch, reset, failure reporting and rate limiting.

use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bestbuy_api::clients::{MockTransport, RecordedRequest};
use bestbuy_api::{
    ApiKey, ApiVersion, BestBuyClient, BestBuyConfig, QueryBuilder, QueryError,
    RequestsPerSecond, ResponseFormat,
};
use serde_json::json;

const REMIX: &str = "http://api.remix.bestbuy.com/v1";

fn config(limit: u32) -> BestBuyConfig {
    BestBuyConfig::builder()
        .api_key(ApiKey::new("test-key"))
        .api_version(ApiVersion::Remix)
        .requests_per_second(RequestsPerSecond::new(limit).unwrap())
        .build()
        .unwrap()
}

fn client_with(transport: MockTransport) -> BestBuyClient<MockTransport> {
    BestBuyClient::with_transport(&config(5), transport)
}

fn epoch_second(request: &RecordedRequest) -> u64 {
    request.at.duration_since(UNIX_EPOCH).unwrap().as_secs()
}

// ============================================================================
// Query Transaction
// ============================================================================

#[tokio::test]
async fn test_query_returns_response_and_resets_state() {
    let mut transport = MockTransport::new();
    transport.register_case(
        &format!("{REMIX}/stores/281.json?show=name&apiKey=test-key"),
        r#"{"name":"Brooklyn"}"#,
        [("http_code", json!(200)), ("content_type", json!("application/json"))],
    );
    let mut client = client_with(transport);

    let response = client
        .store_as(281, ResponseFormat::Json)
        .show(["name"])
        .query()
        .await
        .unwrap();

    assert_eq!(response.data(), r#"{"name":"Brooklyn"}"#);
    assert_eq!(response.get("content_type"), Some(json!("application/json")));
    assert!(!response.is_error());
    assert!(client.pending().targets().is_empty());
    assert!(client.pending().parameters().is_empty());
}

#[tokio::test]
async fn test_query_without_target_leaves_state_untouched() {
    let mut client = client_with(MockTransport::new());
    client.page(2).sort("name.asc");

    let result = client.query().await;

    assert!(matches!(result, Err(QueryError::NoTarget)));
    assert_eq!(client.pending().parameter("page"), Some("2"));
    assert_eq!(client.pending().parameter("sort"), Some("name.asc"));
    assert!(client.transport().requests().is_empty());
    assert_eq!(client.rate_limiter().last_request_second(), None);
}

#[tokio::test]
async fn test_settings_persist_across_queries() {
    let mut client = client_with(MockTransport::new());
    client.set_timeout(30).unwrap();
    client.set_requests_per_second(8).unwrap();

    client.product(1).query().await.unwrap();
    client.product(2).query().await.unwrap();

    assert_eq!(client.timeout().get(), 30);
    assert_eq!(client.rate_limiter().limit().get(), 8);
    assert!(client.rate_limiter().last_request_second().is_some());

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.timeout == Duration::from_secs(30)));
    assert_eq!(requests[1].uri, format!("{REMIX}/products/2.xml?apiKey=test-key"));
}

#[tokio::test]
async fn test_transport_failure_is_reported_in_response() {
    let mut client = client_with(MockTransport::new());

    let response = client.products(["sku=1"]).query().await.unwrap();

    assert_eq!(response.data(), "");
    assert_eq!(response.status_code(), Some(0));
    assert!(response
        .get("error")
        .and_then(|e| e.as_str().map(String::from))
        .unwrap()
        .contains("products(sku=1)"));
    assert!(client.pending().is_empty());
}

#[tokio::test]
async fn test_http_error_status_is_data() {
    let mut transport = MockTransport::new();
    transport.register_case(
        &format!("{REMIX}/products/0.xml?apiKey=test-key"),
        "<error><status>404 Not Found</status></error>",
        [("http_code", json!(404))],
    );
    let mut client = client_with(transport);

    let response = client.product(0).query().await.unwrap();

    assert!(response.is_error());
    let doc = response.to_xml().unwrap();
    assert_eq!(doc.child("status").unwrap().text(), "404 Not Found");
}

#[tokio::test]
async fn test_whitespace_is_encoded_before_dispatch() {
    let mut transport = MockTransport::new();
    transport.register_case(
        &format!("{REMIX}/products(name=ipad air*)?apiKey=test-key"),
        "<products/>",
        [("http_code", json!(200))],
    );
    let mut client = client_with(transport);

    let response = client.products(["name=ipad air*"]).query().await.unwrap();

    assert_eq!(response.data(), "<products/>");
    assert_eq!(
        client.transport().requests()[0].uri,
        format!("{REMIX}/products(name=ipad%20air*)?apiKey=test-key")
    );
}

#[tokio::test]
async fn test_execute_leaves_pending_state_alone() {
    let mut client = client_with(MockTransport::new());
    client.store(1).page(4);

    let query = QueryBuilder::new().product(55).build().unwrap();
    client.execute(&query).await;

    assert_eq!(client.pending().parameter("page"), Some("4"));
    assert_eq!(
        client.transport().requests()[0].uri,
        format!("{REMIX}/products/55.xml?apiKey=test-key")
    );
}

// ============================================================================
// Rate Limiting
// ============================================================================

#[tokio::test]
async fn test_requests_beyond_limit_wait_for_next_second() {
    let limit = 2;
    let mut client = BestBuyClient::with_transport(&config(limit), MockTransport::new());

    for sku in 0..=limit {
        client.product(sku).query().await.unwrap();
    }

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 3);
    assert!(epoch_second(&requests[2]) > epoch_second(&requests[0]));

    let mut per_second: HashMap<u64, u32> = HashMap::new();
    for request in &requests {
        *per_second.entry(epoch_second(request)).or_default() += 1;
    }
    assert!(per_second.values().all(|&count| count <= limit));
}

#[tokio::test]
async fn test_requests_within_limit_do_not_wait() {
    let mut client = BestBuyClient::with_transport(&config(50), MockTransport::new());
    let started = SystemTime::now();

    for sku in 0..5 {
        client.product(sku).query().await.unwrap();
    }

    assert!(started.elapsed().unwrap() < Duration::from_millis(900));
    assert_eq!(client.transport().requests().len(), 5);
}
