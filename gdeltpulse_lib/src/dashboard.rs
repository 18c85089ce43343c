//! One-shot dashboard: current and previous period fetched side by side,
//! normalized, and reduced to headline numbers.

use gdelt_api::types::{GdeltResponse, MetricKey};
use gdelt_api::{Granularity, ModeResolution, SearchQuery};
use serde::Serialize;

use crate::client::CachedClient;
use crate::error::PulseError;
use crate::kpi::{self, KpiSnapshot};
use crate::normalize::{self, EventRecord, SeriesPoint, SeriesSource};

/// Everything a dashboard view renders for one search.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DashboardSnapshot {
    pub query: SearchQuery,
    pub resolution: ModeResolution,
    /// Granularity after `Auto` is resolved.
    pub granularity: Granularity,
    /// Metric selected from the rows. When `series_source` is `insights`
    /// the series holds recovered counts instead.
    pub metric: MetricKey,
    pub series_source: SeriesSource,
    pub series: Vec<SeriesPoint>,
    pub moving_average: Vec<SeriesPoint>,
    pub sentiment_series: Vec<SeriesPoint>,
    pub events: Vec<EventRecord>,
    pub kpis: KpiSnapshot,
    /// Fetches that failed and were treated as empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Builds a snapshot from already-fetched payloads. `None` stands for a
/// fetch that failed or was skipped.
pub fn assemble(
    query: &SearchQuery,
    current: Option<&GdeltResponse>,
    previous: Option<&GdeltResponse>,
    event_limit: usize,
) -> DashboardSnapshot {
    let resolution = query.resolve();
    let current_rows = current.map(|p| p.data.as_slice()).unwrap_or_default();
    let previous_rows = previous.map(|p| p.data.as_slice()).unwrap_or_default();

    let normalized = normalize::normalize(current, resolution.action, event_limit);
    let moving_average = kpi::moving_average(&normalized.series, kpi::DEFAULT_WINDOW);

    DashboardSnapshot {
        query: query.clone(),
        granularity: query.granularity.resolve(&query.from, &query.to),
        metric: normalize::select_metric_key(current_rows, resolution.action),
        resolution,
        series_source: normalized.series_source,
        series: normalized.series,
        moving_average,
        sentiment_series: normalized.sentiment_series,
        events: normalized.events,
        kpis: KpiSnapshot::compute(current_rows, previous_rows),
        warnings: Vec::new(),
    }
}

/// Fetches the current and previous periods concurrently and assembles the
/// snapshot.
///
/// Either fetch may fail on its own: the failure is logged, recorded in
/// `warnings` and the period is treated as empty. If the current period
/// fails and there is no previous payload either, its error is returned.
pub async fn build_dashboard(
    client: &CachedClient,
    query: &SearchQuery,
    event_limit: usize,
) -> Result<DashboardSnapshot, PulseError> {
    let request = query.to_request()?;
    let previous_request = match query.previous_period() {
        Some(prev) => Some(prev.to_request()?),
        None => {
            tracing::debug!("No previous period for {}..{}", query.from, query.to);
            None
        }
    };

    let (current, previous) = tokio::join!(client.search(&request), async {
        match &previous_request {
            Some(req) => Some(client.search(req).await),
            None => None,
        }
    });

    let mut warnings = Vec::new();
    let previous = match previous {
        Some(Ok(payload)) => Some(payload),
        Some(Err(e)) => {
            tracing::warn!("Previous period fetch failed, delta uses zero: {}", e);
            warnings.push(format!("previous period unavailable: {}", e));
            None
        }
        None => None,
    };
    let current = match current {
        Ok(payload) => Some(payload),
        Err(e) if previous.is_some() => {
            tracing::warn!("Current period fetch failed, showing empty data: {}", e);
            warnings.push(format!("current period unavailable: {}", e));
            None
        }
        Err(e) => return Err(e),
    };

    let mut snapshot = assemble(query, current.as_ref(), previous.as_ref(), event_limit);
    snapshot.warnings = warnings;
    Ok(snapshot)
}
