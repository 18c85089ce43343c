use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dates;

/// Keys a row's day may be stored under, in lookup order.
pub const ROW_DATE_KEYS: &[&str] = &["DayDate", "date", "SQLDATE"];

/// Numeric fields the upstream reports per day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    InteractionCount,
    TotalDailyArticles,
    ConflictEvents,
    RelativeCoverage,
    AvgSentiment,
    AvgImpact,
}

impl MetricKey {
    pub const ALL: [MetricKey; 6] = [
        MetricKey::InteractionCount,
        MetricKey::TotalDailyArticles,
        MetricKey::ConflictEvents,
        MetricKey::RelativeCoverage,
        MetricKey::AvgSentiment,
        MetricKey::AvgImpact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::InteractionCount => "interaction_count",
            MetricKey::TotalDailyArticles => "total_daily_articles",
            MetricKey::ConflictEvents => "conflict_events",
            MetricKey::RelativeCoverage => "relative_coverage",
            MetricKey::AvgSentiment => "avg_sentiment",
            MetricKey::AvgImpact => "avg_impact",
        }
    }
}

impl std::fmt::Display for MetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One day of upstream data: an open record whose metric fields are
/// optional and may arrive as numbers or numeric strings.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct RawRow(Map<String, Value>);

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date(mut self, date: impl Into<Value>) -> Self {
        self.0.insert("DayDate".to_string(), date.into());
        self
    }

    pub fn with_metric(mut self, key: MetricKey, value: f64) -> Self {
        self.0.insert(key.as_str().to_string(), Value::from(value));
        self
    }

    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The metric as a number. Absent, null and non-numeric values are `None`.
    pub fn metric(&self, key: MetricKey) -> Option<f64> {
        self.0.get(key.as_str()).and_then(lenient_number)
    }

    /// The row's day as `YYYY-MM-DD`, from the first date key that parses.
    pub fn date(&self) -> Option<String> {
        ROW_DATE_KEYS
            .iter()
            .filter_map(|key| self.0.get(*key))
            .find_map(dates::to_iso)
    }
}

impl From<Map<String, Value>> for RawRow {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Reads a JSON number or numeric string. Non-finite values are rejected.
pub fn lenient_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}
