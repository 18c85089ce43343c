//! Headline numbers derived from normalized rows and series.

use gdelt_api::types::{MetricKey, RawRow};
use serde::{Deserialize, Serialize};

use crate::normalize::SeriesPoint;

/// Moving-average window used by the dashboard.
pub const DEFAULT_WINDOW: usize = 28;

/// Total interaction volume. Each row contributes its `interaction_count`
/// when present, else its `conflict_events`, else nothing.
pub fn volume(rows: &[RawRow]) -> f64 {
    rows.iter()
        .map(|row| {
            row.metric(MetricKey::InteractionCount)
                .or_else(|| row.metric(MetricKey::ConflictEvents))
                .unwrap_or(0.0)
        })
        .fold(0.0, |acc, v| acc + v)
}

/// Mean `avg_sentiment`, counting rows without one as zero. Zero for no rows.
pub fn sentiment_avg(rows: &[RawRow]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let sum = rows
        .iter()
        .map(|row| row.metric(MetricKey::AvgSentiment).unwrap_or(0.0))
        .fold(0.0, |acc, v| acc + v);
    sum / rows.len() as f64
}

/// Relative change in volume against the previous period. A zero previous
/// volume divides by 1, so the delta is the current volume itself.
pub fn delta_vs_prev(current: &[RawRow], previous: &[RawRow]) -> f64 {
    let curr = volume(current);
    let prev = volume(previous);
    let denom = if prev == 0.0 { 1.0 } else { prev };
    (curr - prev) / denom
}

/// Trailing mean over at most `window` points, same length as the input.
/// The first points average over what is available so far.
pub fn moving_average(series: &[SeriesPoint], window: usize) -> Vec<SeriesPoint> {
    let window = window.max(1);
    let mut acc = 0.0;
    series
        .iter()
        .enumerate()
        .map(|(i, point)| {
            acc += point.value;
            if i >= window {
                acc -= series[i - window].value;
            }
            let denom = (i + 1).min(window) as f64;
            SeriesPoint {
                date: point.date.clone(),
                value: acc / denom,
            }
        })
        .collect()
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct KpiSnapshot {
    pub volume: f64,
    pub sentiment_avg: f64,
    pub delta_vs_prev: f64,
}

impl KpiSnapshot {
    pub fn compute(current: &[RawRow], previous: &[RawRow]) -> Self {
        Self {
            volume: volume(current),
            sentiment_avg: sentiment_avg(current),
            delta_vs_prev: delta_vs_prev(current, previous),
        }
    }
}
