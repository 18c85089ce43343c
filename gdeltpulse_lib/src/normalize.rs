//! Normalization of raw GDELT payloads into canonical series and events.
//!
//! Upstream rows are flat but inconsistently populated, and the `insights`
//! tree has no fixed schema at all. Everything here is best-effort: missing
//! or malformed input yields empty output, never an error.

use std::collections::{BTreeMap, HashSet};

use gdelt_api::types::{GdeltResponse, MetricKey, RawRow};
use gdelt_api::Action;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::aliases;

/// Deepest level of the insights tree that is visited.
pub const MAX_DEPTH: usize = 64;

/// Events shown when the caller does not say otherwise.
pub const DEFAULT_EVENT_LIMIT: usize = 20;

/// Order tried when none of a mode's own metrics carries a signal.
const GLOBAL_FALLBACK: [MetricKey; 4] = [
    MetricKey::InteractionCount,
    MetricKey::TotalDailyArticles,
    MetricKey::ConflictEvents,
    MetricKey::RelativeCoverage,
];

const SENTIMENT_PRIORITY: [MetricKey; 2] = [MetricKey::AvgSentiment, MetricKey::AvgImpact];

/// One point of a canonical, date-sorted series.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SeriesPoint {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub value: f64,
}

/// An article/event pulled out of the insights tree.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EventRecord {
    pub date: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl EventRecord {
    /// Deduplication key: the date plus the source, or the title without one.
    fn dedup_key(&self) -> (String, String) {
        (
            self.date.clone(),
            self.source.clone().unwrap_or_else(|| self.title.clone()),
        )
    }
}

/// Where the main series came from.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeriesSource {
    /// The selected metric of the payload rows.
    #[default]
    Rows,
    /// Dated counts recovered from the insights tree.
    Insights,
}

/// Canonical view of one payload.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct NormalizedData {
    pub series: Vec<SeriesPoint>,
    pub series_source: SeriesSource,
    pub sentiment_series: Vec<SeriesPoint>,
    pub events: Vec<EventRecord>,
}

/// Metric candidates for an action, most relevant first.
pub fn metric_priority(action: Action) -> &'static [MetricKey] {
    match action {
        Action::Context | Action::Search => &[
            MetricKey::InteractionCount,
            MetricKey::TotalDailyArticles,
            MetricKey::ConflictEvents,
            MetricKey::RelativeCoverage,
        ],
        Action::Bilateral => &[
            MetricKey::ConflictEvents,
            MetricKey::InteractionCount,
            MetricKey::TotalDailyArticles,
        ],
        Action::BilateralConflictCoverage => &[
            MetricKey::RelativeCoverage,
            MetricKey::ConflictEvents,
            MetricKey::InteractionCount,
        ],
    }
}

fn has_signal(rows: &[RawRow], key: MetricKey) -> bool {
    rows.iter()
        .any(|row| row.metric(key).is_some_and(|v| v != 0.0))
}

/// Picks the metric to chart: the first of the action's candidates, then of
/// the global fallback order, that is nonzero in any row. Defaults to the
/// action's first candidate.
pub fn select_metric_key(rows: &[RawRow], action: Action) -> MetricKey {
    let priorities = metric_priority(action);
    priorities
        .iter()
        .chain(GLOBAL_FALLBACK.iter())
        .copied()
        .find(|key| has_signal(rows, *key))
        .unwrap_or(priorities[0])
}

/// Maps rows to `(date, metric)` points in row order. Rows without a
/// readable date are skipped; a missing metric counts as zero.
pub fn build_metric_series(rows: &[RawRow], key: MetricKey) -> Vec<SeriesPoint> {
    rows.iter()
        .filter_map(|row| {
            Some(SeriesPoint {
                date: row.date()?,
                value: row.metric(key).unwrap_or(0.0),
            })
        })
        .collect()
}

pub fn coverage_series(rows: &[RawRow]) -> Vec<SeriesPoint> {
    build_metric_series(rows, MetricKey::RelativeCoverage)
}

/// The main volume series for a payload.
///
/// When every row is zero and insights are present, the series is rebuilt
/// from dated counts found anywhere in the insights tree.
pub fn build_main_series(
    rows: &[RawRow],
    action: Action,
    insights: Option<&Value>,
) -> Vec<SeriesPoint> {
    main_series_with_source(rows, action, insights).0
}

fn main_series_with_source(
    rows: &[RawRow],
    action: Action,
    insights: Option<&Value>,
) -> (Vec<SeriesPoint>, SeriesSource) {
    let key = select_metric_key(rows, action);
    let series = build_metric_series(rows, key);

    let insights = match insights {
        Some(value) if !value.is_null() => value,
        _ => return (series, SeriesSource::Rows),
    };
    if series.iter().any(|p| p.value != 0.0) {
        return (series, SeriesSource::Rows);
    }

    let mut points = BTreeMap::new();
    collect_timeline(insights, 0, &mut points);
    if points.is_empty() {
        return (series, SeriesSource::Rows);
    }
    tracing::debug!(
        "Rows carried no {} signal, rebuilt {} points from insights",
        key,
        points.len()
    );
    let points = points
        .into_iter()
        .map(|(date, value)| SeriesPoint { date, value })
        .collect();
    (points, SeriesSource::Insights)
}

/// Average sentiment per day, falling back to average impact. Empty when
/// neither metric carries a signal.
pub fn build_sentiment_series(rows: &[RawRow]) -> Vec<SeriesPoint> {
    SENTIMENT_PRIORITY
        .iter()
        .find(|key| has_signal(rows, **key))
        .map(|key| build_metric_series(rows, *key))
        .unwrap_or_default()
}

fn collect_timeline(value: &Value, depth: usize, points: &mut BTreeMap<String, f64>) {
    if depth > MAX_DEPTH {
        return;
    }
    match value {
        Value::Array(items) => {
            for item in items {
                if let Some((date, v)) = parse_timeline_datum(item) {
                    *points.entry(date).or_insert(0.0) += v;
                    continue;
                }
                collect_timeline(item, depth + 1, points);
            }
        }
        Value::Object(map) => {
            for nested in map.values() {
                collect_timeline(nested, depth + 1, points);
            }
        }
        _ => {}
    }
}

fn parse_timeline_datum(value: &Value) -> Option<(String, f64)> {
    let record = value.as_object()?;
    let date = aliases::first_date(record)?;
    let count = aliases::first_number(record, aliases::VALUE_KEYS)?;
    Some((date, count))
}

/// Collects up to `limit` distinct events from anywhere in the insights tree,
/// newest first.
///
/// An object is an event when it has both a readable date and a source URL.
/// The first occurrence of each `(date, source)` wins and the walk stops as
/// soon as `limit` events are held.
pub fn extract_events(insights: Option<&Value>, limit: usize) -> Vec<EventRecord> {
    let insights = match insights {
        Some(value) if limit > 0 => value,
        _ => return Vec::new(),
    };

    let mut walk = EventWalk {
        limit,
        seen: HashSet::new(),
        events: Vec::new(),
    };
    walk.visit(insights, 0);

    let mut events = walk.events;
    events.sort_by(|a, b| b.date.cmp(&a.date));
    events.truncate(limit);
    events
}

struct EventWalk {
    limit: usize,
    seen: HashSet<(String, String)>,
    events: Vec<EventRecord>,
}

impl EventWalk {
    fn full(&self) -> bool {
        self.events.len() >= self.limit
    }

    fn visit(&mut self, value: &Value, depth: usize) {
        if depth > MAX_DEPTH || self.full() {
            return;
        }
        match value {
            Value::Object(map) => {
                if let Some(event) = parse_event(map) {
                    if self.seen.insert(event.dedup_key()) {
                        self.events.push(event);
                    }
                }
                for nested in map.values() {
                    if self.full() {
                        return;
                    }
                    self.visit(nested, depth + 1);
                }
            }
            Value::Array(items) => {
                for item in items {
                    if self.full() {
                        return;
                    }
                    self.visit(item, depth + 1);
                }
            }
            _ => {}
        }
    }
}

fn parse_event(record: &Map<String, Value>) -> Option<EventRecord> {
    let date = aliases::first_date(record)?;
    let source = aliases::first_string(record, aliases::SOURCE_KEYS)?;
    let title = aliases::first_string(record, aliases::TITLE_KEYS)
        .unwrap_or_else(|| hostname_or_raw(&source));

    Some(EventRecord {
        date,
        title,
        tone: aliases::first_tone(record),
        impact: aliases::first_number(record, aliases::IMPACT_KEYS),
        source: Some(source),
    })
}

fn hostname_or_raw(source: &str) -> String {
    Url::parse(source)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| source.to_string())
}

/// Normalizes a whole payload. `None` (a failed or skipped fetch) gives
/// empty output.
pub fn normalize(payload: Option<&GdeltResponse>, action: Action, limit: usize) -> NormalizedData {
    let payload = match payload {
        Some(p) => p,
        None => return NormalizedData::default(),
    };
    let insights = payload.insights.as_ref();
    let (series, series_source) = main_series_with_source(&payload.data, action, insights);
    NormalizedData {
        series,
        series_source,
        sentiment_series: build_sentiment_series(&payload.data),
        events: extract_events(insights, limit),
    }
}
