use chrono::NaiveDate;
use serde::Serialize;

use crate::{dates, Error};

use super::classify::{classify, QueryKind};
use super::granularity::Granularity;
use super::mode::{ModeHint, ModeResolution};
use super::request::GdeltRequest;

/// Default look-back window, in days.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// A user search: free text over an ISO date range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub text: String,
    /// Start date, `YYYY-MM-DD`.
    pub from: String,
    /// End date, `YYYY-MM-DD`.
    pub to: String,
    pub granularity: Granularity,
    pub mode_hint: Option<ModeHint>,
}

impl SearchQuery {
    pub fn new(text: &str, from: &str, to: &str) -> Self {
        Self {
            text: text.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            granularity: Granularity::Auto,
            mode_hint: None,
        }
    }

    /// Empty query over the `days` days ending on `today`.
    pub fn last_days(days: i64, today: NaiveDate) -> Self {
        let (from, to) = dates::last_n_days(days, today);
        Self::new("", &from, &to)
    }

    /// The default search: last 30 days, no text, auto granularity.
    pub fn default_for(today: NaiveDate) -> Self {
        Self::last_days(DEFAULT_WINDOW_DAYS, today)
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn with_mode_hint(mut self, mode_hint: ModeHint) -> Self {
        self.mode_hint = Some(mode_hint);
        self
    }

    pub fn kind(&self) -> QueryKind {
        classify(&self.text)
    }

    pub fn resolve(&self) -> ModeResolution {
        ModeResolution::resolve(&self.kind(), self.mode_hint)
    }

    /// Classifies, resolves and builds the outbound request in one go.
    pub fn to_request(&self) -> Result<GdeltRequest, Error> {
        GdeltRequest::build(&self.resolve(), self)
    }

    /// The same search over the preceding window of equal length.
    pub fn previous_period(&self) -> Option<SearchQuery> {
        let (from, to) = dates::previous_period(&self.from, &self.to)?;
        Some(Self {
            from,
            to,
            ..self.clone()
        })
    }
}
