//! Ordered alias tables for loosely-keyed upstream records.
//!
//! The same logical field shows up under different names depending on the
//! table and API version that produced a node. Each table lists the names in
//! lookup order; the first alias that yields a usable value wins.

use gdelt_api::dates;
use gdelt_api::types::lenient_number;
use serde_json::{Map, Value};

pub const DATE_KEYS: &[&str] = &["SQLDATE", "date", "Date", "DayDate", "Day"];

pub const SOURCE_KEYS: &[&str] = &[
    "SOURCEURL",
    "SourceURL",
    "sourceUrl",
    "sourceURL",
    "source_url",
    "DocumentIdentifier",
];

pub const TITLE_KEYS: &[&str] = &[
    "DocumentTitle",
    "EventTitle",
    "title",
    "Title",
    "NormalizedTitle",
    "EnglishTitle",
    "SourceCommonName",
];

pub const TONE_KEYS: &[&str] = &["V2Tone", "Tone", "avg_sentiment", "AvgTone", "AvgSentiment"];

pub const IMPACT_KEYS: &[&str] = &["GoldsteinScale", "avg_impact", "AvgGoldstein"];

/// Names a timeline datum may carry its count under.
pub const VALUE_KEYS: &[&str] = &[
    "value",
    "Value",
    "count",
    "Count",
    "volume",
    "Volume",
    "mentions",
    "Mentions",
    "articles",
    "Articles",
    "total",
    "Total",
    "interaction_count",
    "conflict_events",
    "total_daily_articles",
    "relative_coverage",
];

/// First alias present in `record` for which `read` returns a value.
pub fn first_match<T>(
    record: &Map<String, Value>,
    keys: &[&str],
    read: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(read)
}

/// The record's date as `YYYY-MM-DD`.
pub fn first_date(record: &Map<String, Value>) -> Option<String> {
    first_match(record, DATE_KEYS, dates::to_iso)
}

/// First non-blank string among `keys`, trimmed.
pub fn first_string(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    first_match(record, keys, |value| match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}

pub fn first_number(record: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    first_match(record, keys, lenient_number)
}

/// Tone, accepting GDELT 2.0's comma-separated `V2Tone` whose first field is
/// the average tone.
pub fn first_tone(record: &Map<String, Value>) -> Option<f64> {
    first_match(record, TONE_KEYS, |value| {
        lenient_number(value).or_else(|| match value {
            Value::String(s) => s
                .split(',')
                .next()?
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite()),
            _ => None,
        })
    })
}
