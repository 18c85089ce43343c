use gdeltpulse_lib::normalize::DEFAULT_EVENT_LIMIT;
use gdeltpulse_lib::types::MetricKey;
use gdeltpulse_lib::{
    build_dashboard, CachedClient, MemoryCache, RetryConfig, SearchQuery, SeriesSource,
};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn client(server: &MockServer) -> CachedClient {
    CachedClient::with_base_url(&server.uri(), MemoryCache::new(Duration::from_secs(60)))
        .with_retry_config(RetryConfig {
            max_retries: 0,
            base_delay_ms: 1,
            max_delay_ms: 1,
        })
}

/// 2025-01-01..2025-01-03; the previous period is 2024-12-30..2025-01-01.
fn context_query() -> SearchQuery {
    SearchQuery::new("prediction market", "2025-01-01", "2025-01-03")
}

async fn mount_period(server: &MockServer, date_start: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v2"))
        .and(query_param("date_start", date_start))
        .respond_with(response)
        .mount(server)
        .await;
}

const PREVIOUS_BODY: &str = r#"{"status":"success","data":[{"DayDate":20241230,"interaction_count":150}]}"#;

#[tokio::test]
async fn dashboard_combines_both_periods() {
    let mock_server = MockServer::start().await;
    mount_period(
        &mock_server,
        "20250101",
        ResponseTemplate::new(200).set_body_string(load_fixture("context.json")),
    )
    .await;
    mount_period(
        &mock_server,
        "20241230",
        ResponseTemplate::new(200).set_body_string(PREVIOUS_BODY),
    )
    .await;

    let snap = build_dashboard(&client(&mock_server), &context_query(), DEFAULT_EVENT_LIMIT)
        .await
        .unwrap();

    assert_eq!(snap.metric, MetricKey::InteractionCount);
    assert_eq!(snap.series_source, SeriesSource::Rows);
    let values: Vec<f64> = snap.series.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![120.0, 80.0, 100.0]);
    let averages: Vec<f64> = snap.moving_average.iter().map(|p| p.value).collect();
    assert_eq!(averages, vec![120.0, 100.0, 100.0]);
    assert_eq!(snap.sentiment_series.len(), 3);

    assert_eq!(snap.kpis.volume, 300.0);
    assert_eq!(snap.kpis.delta_vs_prev, 1.0);
    assert!((snap.kpis.sentiment_avg + 1.0 / 3.0).abs() < 1e-12);
    assert!(snap.warnings.is_empty());
}

#[tokio::test]
async fn dashboard_events_are_deduplicated_and_sorted() {
    let mock_server = MockServer::start().await;
    mount_period(
        &mock_server,
        "20250101",
        ResponseTemplate::new(200).set_body_string(load_fixture("context.json")),
    )
    .await;
    mount_period(
        &mock_server,
        "20241230",
        ResponseTemplate::new(200).set_body_string(PREVIOUS_BODY),
    )
    .await;

    let snap = build_dashboard(&client(&mock_server), &context_query(), DEFAULT_EVENT_LIMIT)
        .await
        .unwrap();

    let dates: Vec<&str> = snap.events.iter().map(|e| e.date.as_str()).collect();
    assert_eq!(dates, vec!["2025-01-03", "2025-01-02", "2025-01-01"]);

    let top = &snap.events[0];
    assert_eq!(top.title, "Prediction markets draw record volume");
    assert_eq!(top.tone, Some(-1.25));
    assert_eq!(top.impact, Some(1.9));

    let untitled = &snap.events[1];
    assert_eq!(untitled.title, "apnews.com");
    assert_eq!(untitled.tone, Some(-2.5));
    assert_eq!(untitled.impact, None);

    assert_eq!(snap.events[2].title, "Regulators eye election betting");
}

#[tokio::test]
async fn dashboard_falls_back_to_insights_timeline() {
    let mock_server = MockServer::start().await;
    mount_period(
        &mock_server,
        "20250101",
        ResponseTemplate::new(200).set_body_string(load_fixture("context_empty_rows.json")),
    )
    .await;
    mount_period(
        &mock_server,
        "20241230",
        ResponseTemplate::new(200).set_body_string(PREVIOUS_BODY),
    )
    .await;

    let snap = build_dashboard(&client(&mock_server), &context_query(), DEFAULT_EVENT_LIMIT)
        .await
        .unwrap();

    let points: Vec<(&str, f64)> = snap
        .series
        .iter()
        .map(|p| (p.date.as_str(), p.value))
        .collect();
    assert_eq!(points, vec![("2025-01-01", 15.0), ("2025-01-03", 42.0)]);
    assert_eq!(snap.series_source, SeriesSource::Insights);
    assert!(snap.events.is_empty());
    assert_eq!(snap.kpis.volume, 0.0);
}

#[tokio::test]
async fn dashboard_tolerates_previous_period_failure() {
    let mock_server = MockServer::start().await;
    mount_period(
        &mock_server,
        "20250101",
        ResponseTemplate::new(200).set_body_string(load_fixture("context.json")),
    )
    .await;
    mount_period(&mock_server, "20241230", ResponseTemplate::new(502)).await;

    let snap = build_dashboard(&client(&mock_server), &context_query(), DEFAULT_EVENT_LIMIT)
        .await
        .unwrap();

    assert_eq!(snap.series.len(), 3);
    assert_eq!(snap.kpis.delta_vs_prev, 300.0);
    assert_eq!(snap.warnings.len(), 1);
    assert!(snap.warnings[0].starts_with("previous period unavailable"));
}

#[tokio::test]
async fn dashboard_tolerates_current_period_failure() {
    let mock_server = MockServer::start().await;
    mount_period(&mock_server, "20250101", ResponseTemplate::new(503)).await;
    mount_period(
        &mock_server,
        "20241230",
        ResponseTemplate::new(200).set_body_string(PREVIOUS_BODY),
    )
    .await;

    let snap = build_dashboard(&client(&mock_server), &context_query(), DEFAULT_EVENT_LIMIT)
        .await
        .unwrap();

    assert!(snap.series.is_empty());
    assert_eq!(snap.kpis.volume, 0.0);
    assert_eq!(snap.kpis.delta_vs_prev, -1.0);
    assert!(snap.warnings[0].starts_with("current period unavailable"));
}

#[tokio::test]
async fn dashboard_errors_when_both_periods_fail() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let result = build_dashboard(&client(&mock_server), &context_query(), 5).await;
    assert!(result.is_err());
}
