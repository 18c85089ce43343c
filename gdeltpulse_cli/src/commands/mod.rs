//! CLI subcommand implementations.

pub mod search;
pub mod url;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use gdeltpulse_lib::gdelt_api::{dates, DEFAULT_WINDOW_DAYS};
use gdeltpulse_lib::validation;
use gdeltpulse_lib::SearchQuery;

/// Query arguments shared by every subcommand.
#[derive(Args, Debug, Default)]
pub struct QueryArgs {
    /// Query text: keywords, a country code (ITA), a pair (USA CHN) or a
    /// directional pair (USA->CHN)
    #[arg(allow_hyphen_values = true)]
    pub text: Vec<String>,

    /// Start date (YYYY-MM-DD). Defaults to --days before --to
    #[arg(long)]
    pub from: Option<String>,

    /// End date (YYYY-MM-DD). Defaults to today
    #[arg(long)]
    pub to: Option<String>,

    /// Look-back window in days when --from is omitted
    #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS)]
    pub days: i64,

    /// Granularity: auto, daily (d), monthly (m)
    #[arg(long, default_value = "auto")]
    pub granularity: String,

    /// Mode hint: context, search, bilateral, bbva
    #[arg(long)]
    pub mode: Option<String>,
}

impl QueryArgs {
    /// Validates the arguments into a [`SearchQuery`], filling missing dates
    /// relative to `today`.
    pub fn to_search_query(&self, today: NaiveDate) -> Result<SearchQuery> {
        if !(1..=36500).contains(&self.days) {
            anyhow::bail!("--days must be between 1 and 36500, got {}", self.days);
        }
        let to = match &self.to {
            Some(to) => to.clone(),
            None => today.format("%Y-%m-%d").to_string(),
        };
        let from = match &self.from {
            Some(from) => from.clone(),
            None => {
                let end = validation::validate_date(&to)?;
                dates::last_n_days(self.days, end).0
            }
        };
        let query = validation::build_search_query(
            &self.text.join(" "),
            &from,
            &to,
            Some(&self.granularity),
            self.mode.as_deref(),
        )?;
        Ok(query)
    }
}
