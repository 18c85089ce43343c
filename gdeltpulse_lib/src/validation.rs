use chrono::NaiveDate;
use gdelt_api::{Granularity, ModeHint, SearchQuery};

use crate::error::PulseError;

pub const MAX_QUERY_LENGTH: usize = 200;
pub const MAX_EVENT_LIMIT: usize = 500;

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, PulseError> {
    if input.len() > max_len {
        return Err(PulseError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    Ok(input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string())
}

/// Validate free query text. Empty text is allowed and means "no keywords".
pub fn validate_query_text(input: &str) -> Result<String, PulseError> {
    sanitize_text(input, MAX_QUERY_LENGTH)
}

/// Validate a YYYY-MM-DD date string.
pub fn validate_date(input: &str) -> Result<NaiveDate, PulseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PulseError::InvalidInput("Invalid date range".to_string()));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        PulseError::InvalidInput(format!(
            "invalid date '{}'. Expected format: YYYY-MM-DD (e.g., 2025-01-31)",
            trimmed
        ))
    })
}

/// Both ends present and parseable, and `from <= to`.
pub fn validate_date_range(from: &str, to: &str) -> Result<(NaiveDate, NaiveDate), PulseError> {
    let start = validate_date(from)?;
    let end = validate_date(to)?;
    if start > end {
        return Err(PulseError::InvalidInput(
            "Start date must be <= end date".to_string(),
        ));
    }
    Ok((start, end))
}

pub fn validate_granularity(input: &str) -> Result<Granularity, PulseError> {
    input.parse::<Granularity>().map_err(|_| {
        PulseError::InvalidInput(format!(
            "unknown granularity '{}'. Valid values: auto, daily (d), monthly (m)",
            input
        ))
    })
}

pub fn validate_mode(input: &str) -> Result<ModeHint, PulseError> {
    input.parse::<ModeHint>().map_err(|_| {
        PulseError::InvalidInput(format!(
            "unknown mode '{}'. Valid values: context, search, bilateral, bbva",
            input
        ))
    })
}

/// Validate the number of events to return: must be 1..=500.
pub fn validate_event_limit(limit: usize) -> Result<usize, PulseError> {
    if !(1..=MAX_EVENT_LIMIT).contains(&limit) {
        return Err(PulseError::InvalidInput(format!(
            "event limit must be between 1 and {}, got {}",
            MAX_EVENT_LIMIT, limit
        )));
    }
    Ok(limit)
}

/// Validates raw user input and assembles a [`SearchQuery`] from it.
///
/// Dates are re-rendered as zero-padded ISO strings, so `2025-1-5` is sent as
/// `2025-01-05`.
pub fn build_search_query(
    text: &str,
    from: &str,
    to: &str,
    granularity: Option<&str>,
    mode: Option<&str>,
) -> Result<SearchQuery, PulseError> {
    let text = validate_query_text(text)?;
    let (start, end) = validate_date_range(from, to)?;
    let mut query = SearchQuery::new(
        &text,
        &start.format("%Y-%m-%d").to_string(),
        &end.format("%Y-%m-%d").to_string(),
    );
    if let Some(g) = granularity {
        query = query.with_granularity(validate_granularity(g)?);
    }
    if let Some(m) = mode {
        query = query.with_mode_hint(validate_mode(m)?);
    }
    Ok(query)
}
