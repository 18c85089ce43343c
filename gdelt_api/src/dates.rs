//! Conversions between ISO `yyyy-mm-dd` dates and GDELT's compact encodings.
//!
//! GDELT keys days as 8-digit `YYYYMMDD` values (sometimes numbers, sometimes
//! strings) and event timestamps as 14-digit `YYYYMMDDhhmmss`. Everything in
//! this module is total: input that cannot be read as a date yields `None`.

use chrono::{Duration, NaiveDate};
use serde_json::Value;

/// Strips the dashes from an ISO date: `2025-01-31` -> `20250131`.
pub fn to_compact(iso: &str) -> String {
    iso.trim().replace('-', "")
}

/// Normalizes a JSON date value (number or string) to `YYYY-MM-DD`.
pub fn to_iso(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => to_iso_str(s),
        Value::Number(n) => {
            let digits = match n.as_u64() {
                Some(v) => v.to_string(),
                None => {
                    let f = n.as_f64()?;
                    if f < 0.0 || f.fract() != 0.0 || !f.is_finite() {
                        return None;
                    }
                    format!("{:.0}", f)
                }
            };
            to_iso_str(&digits)
        }
        _ => None,
    }
}

/// Normalizes a compact (8 or 14 digit) or ISO-like string to `YYYY-MM-DD`.
///
/// ISO-like input is truncated to its first 10 characters, so
/// `2025-01-03T10:00:00Z` becomes `2025-01-03`.
pub fn to_iso_str(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if (s.len() == 8 || s.len() == 14) && s.bytes().all(|b| b.is_ascii_digit()) {
        return Some(format!("{}-{}-{}", &s[0..4], &s[4..6], &s[6..8]));
    }
    if is_iso_prefixed(s) {
        return Some(s[..10].to_string());
    }
    None
}

fn is_iso_prefixed(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..10].iter().all(u8::is_ascii_digit)
}

/// Parses any encoding [`to_iso_str`] accepts into a calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let iso = to_iso_str(raw)?;
    NaiveDate::parse_from_str(&iso, "%Y-%m-%d").ok()
}

/// Calendar-day difference `b - a`. `None` if either side does not parse.
pub fn day_diff(a: &str, b: &str) -> Option<i64> {
    let a = parse_date(a)?;
    let b = parse_date(b)?;
    Some((b - a).num_days())
}

/// The `n`-day window ending on `today`, as ISO strings.
pub fn last_n_days(n: i64, today: NaiveDate) -> (String, String) {
    let from = today - Duration::days(n);
    (format_iso(from), format_iso(today))
}

/// The window of equal length immediately before `[from, to]`, shifted back
/// by the span of the window.
pub fn previous_period(from: &str, to: &str) -> Option<(String, String)> {
    let start = parse_date(from)?;
    let end = parse_date(to)?;
    let span = Duration::days((end - start).num_days());
    Some((format_iso(start - span), format_iso(end - span)))
}

fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
