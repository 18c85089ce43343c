use gdelt_api::{Client, Error, SearchQuery, UpstreamErrorKind};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn context_query() -> SearchQuery {
    SearchQuery::new("prediction market", "2025-01-01", "2025-01-03")
}

#[tokio::test]
async fn search_context_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("context.json");

    Mock::given(method("GET"))
        .and(path("/v2"))
        .and(query_param("action", "context"))
        .and(query_param("keywords", "prediction market"))
        .and(query_param("date_start", "20250101"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let request = context_query().to_request().unwrap();
    let result = client.search(&request).await;
    assert!(result.is_ok());

    let resp = result.unwrap();
    assert_eq!(resp.data.len(), 3);
    assert!(resp.insights.is_some());
}

#[tokio::test]
async fn search_bilateral_uses_unversioned_path() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("bilateral.json");

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("action", "bilateral"))
        .and(query_param("country1", "USA"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let request = SearchQuery::new("USA CHN", "2025-01-10", "2025-01-11")
        .to_request()
        .unwrap();
    let resp = client.search(&request).await.unwrap();
    assert_eq!(resp.data.len(), 2);
}

#[tokio::test]
async fn search_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let request = context_query().to_request().unwrap();
    let result = client.search(&request).await;
    match result {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "Service Unavailable");
        }
        _ => panic!("expected HttpStatus error"),
    }
}

#[tokio::test]
async fn search_upstream_error_payload() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("error.json");

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let request = context_query().to_request().unwrap();
    match client.search(&request).await {
        Err(Error::Upstream { kind, message }) => {
            assert_eq!(kind, UpstreamErrorKind::InvalidRequest);
            assert!(message.contains("365 days"));
        }
        _ => panic!("expected Upstream error"),
    }
}

#[tokio::test]
async fn search_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let request = context_query().to_request().unwrap();
    let result = client.search(&request).await;
    assert!(matches!(result, Err(Error::RequestFailed)));
}
