use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dates;

/// Longest range, in days, the upstream serves at daily resolution.
pub const MAX_DAILY_SPAN_DAYS: i64 = 365;

/// Temporal bucketing of a series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Let [`Granularity::suggest`] decide from the range. This is the default.
    #[default]
    Auto,
    Daily,
    Monthly,
}

impl Granularity {
    /// `Daily` for ranges of at most 365 days (inclusive), `Monthly` otherwise.
    ///
    /// An unparseable range is never "at most 365 days", so it gets `Monthly`.
    pub fn suggest(from: &str, to: &str) -> Granularity {
        match dates::day_diff(from, to) {
            Some(days) if days <= MAX_DAILY_SPAN_DAYS => Granularity::Daily,
            _ => Granularity::Monthly,
        }
    }

    /// The explicit choice, or the suggestion when this is `Auto`.
    pub fn resolve(self, from: &str, to: &str) -> Granularity {
        match self {
            Granularity::Auto => Granularity::suggest(from, to),
            explicit => explicit,
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Granularity::Auto => "auto",
                Granularity::Daily => "daily",
                Granularity::Monthly => "monthly",
            }
        )
    }
}

impl FromStr for Granularity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Granularity::Auto),
            "daily" | "day" | "d" => Ok(Granularity::Daily),
            "monthly" | "month" | "m" => Ok(Granularity::Monthly),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggest_is_inclusive_at_365_days() {
        // 2023 is not a leap year: Jan 1 -> Jan 1 is 365 days.
        assert_eq!(
            Granularity::suggest("2023-01-01", "2024-01-01"),
            Granularity::Daily
        );
        assert_eq!(
            Granularity::suggest("2023-01-01", "2024-01-02"),
            Granularity::Monthly
        );
    }

    #[test]
    fn suggest_short_and_unparseable_ranges() {
        assert_eq!(
            Granularity::suggest("2025-01-01", "2025-01-31"),
            Granularity::Daily
        );
        assert_eq!(Granularity::suggest("", "2025-01-31"), Granularity::Monthly);
    }

    #[test]
    fn resolve_keeps_explicit_choice() {
        assert_eq!(
            Granularity::Monthly.resolve("2025-01-01", "2025-01-02"),
            Granularity::Monthly
        );
        assert_eq!(
            Granularity::Daily.resolve("2020-01-01", "2025-01-01"),
            Granularity::Daily
        );
        assert_eq!(
            Granularity::Auto.resolve("2020-01-01", "2025-01-01"),
            Granularity::Monthly
        );
    }

    #[test]
    fn parse_from_str() {
        assert_eq!("Daily".parse::<Granularity>(), Ok(Granularity::Daily));
        assert_eq!("m".parse::<Granularity>(), Ok(Granularity::Monthly));
        assert_eq!("auto".parse::<Granularity>(), Ok(Granularity::Auto));
        assert!("weekly".parse::<Granularity>().is_err());
    }
}
