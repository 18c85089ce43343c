//! Shared request infrastructure: the [`Query`] trait and the [`DateWindow`]
//! every GDELT action carries.

use url::Url;

use crate::dates;

use super::granularity::Granularity;

/// Trait implemented by request builders. Provides URL serialization of the
/// flat parameter list handed to the transport.
pub trait Query {
    /// Ordered `(key, value)` parameters, unencoded.
    fn params(&self) -> Vec<(&'static str, String)>;

    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        for (key, value) in self.params() {
            url.query_pairs_mut().append_pair(key, &value);
        }
        url
    }
}

/// Date range in the upstream's compact encoding, plus the daily flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateWindow {
    /// Start date, `YYYYMMDD`.
    pub date_start: String,
    /// End date, `YYYYMMDD`.
    pub date_end: String,
    /// Whether `granularity=daily` is sent. Monthly is the upstream default.
    pub daily: bool,
}

impl DateWindow {
    /// Builds the window from ISO dates, resolving `Auto` granularity.
    pub fn new(from: &str, to: &str, granularity: Granularity) -> Self {
        let resolved = granularity.resolve(from, to);
        if granularity == Granularity::Daily && dates::day_diff(from, to).unwrap_or(0) > 365 {
            tracing::warn!(
                "Daily granularity requested for {}..{} (over 365 days); upstream may reject it",
                from,
                to
            );
        }
        Self {
            date_start: dates::to_compact(from),
            date_end: dates::to_compact(to),
            daily: resolved == Granularity::Daily,
        }
    }

    /// The window's parameters in upstream order.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("date_start", self.date_start.clone()),
            ("date_end", self.date_end.clone()),
        ];
        if self.daily {
            params.push(("granularity", "daily".to_string()));
        }
        params
    }
}
