use gdeltpulse_lib::gdelt_api::Error;
use gdeltpulse_lib::{CachedClient, MemoryCache, ModeHint, PulseError, RetryConfig, SearchQuery};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn fast_retry(max_retries: usize) -> RetryConfig {
    RetryConfig {
        max_retries,
        base_delay_ms: 1,
        max_delay_ms: 5,
    }
}

fn client(server: &MockServer, max_retries: usize) -> CachedClient {
    CachedClient::with_base_url(&server.uri(), MemoryCache::new(Duration::from_secs(60)))
        .with_retry_config(fast_retry(max_retries))
}

fn context_query() -> SearchQuery {
    SearchQuery::new("prediction market", "2025-01-01", "2025-01-03")
}

#[tokio::test]
async fn second_identical_search_is_served_from_cache() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2"))
        .and(query_param("action", "context"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("context.json")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, 0);
    let first = client.search_query(&context_query()).await.unwrap();
    let second = client.search_query(&context_query()).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(second.data.len(), 3);
}

#[tokio::test]
async fn entry_points_building_the_same_url_share_an_entry() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2"))
        .and(query_param("action", "context"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("context.json")))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, 0);
    let hinted = context_query().with_mode_hint(ModeHint::Context).to_request().unwrap();
    assert_eq!(
        client.request_url(&hinted).unwrap(),
        client.request_url(&context_query().to_request().unwrap()).unwrap()
    );

    // Both calls resolve to one URL, so only the first reaches upstream.
    let first = client.search_query(&context_query()).await.unwrap();
    let second = client.search(&hinted).await.unwrap();
    assert_eq!(first, second);

    // A different window is a different URL.
    let later = SearchQuery::new("prediction market", "2025-01-02", "2025-01-03");
    client.search_query(&later).await.unwrap();
}

#[tokio::test]
async fn clear_cache_forces_refetch() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("context.json")))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, 0);
    client.search_query(&context_query()).await.unwrap();
    client.clear_cache();
    client.search_query(&context_query()).await.unwrap();
}

#[tokio::test]
async fn transient_failure_is_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("action", "bilateral"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("action", "bilateral"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("bilateral.json")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, 2);
    let query = SearchQuery::new("USA CHN", "2025-01-10", "2025-01-11");
    let resp = client.search_query(&query).await.unwrap();
    assert_eq!(resp.data.len(), 2);
}

#[tokio::test]
async fn permanent_failure_is_not_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, 3);
    let err = client.search_query(&context_query()).await.unwrap_err();
    match err {
        PulseError::Api(Error::HttpStatus { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected HttpStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn retries_stop_at_configured_maximum() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, 2);
    let err = client.search_query(&context_query()).await.unwrap_err();
    assert_eq!(err.status_code(), 429);
}

#[tokio::test]
async fn failures_are_not_cached() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("context.json")))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, 0);
    assert!(client.search_query(&context_query()).await.is_err());
    assert!(client.search_query(&context_query()).await.is_ok());
}
