use anyhow::Result;
use chrono::Utc;
use clap::Args;
use gdeltpulse_lib::normalize::DEFAULT_EVENT_LIMIT;
use gdeltpulse_lib::validation;
use gdeltpulse_lib::{build_dashboard, CachedClient, SeriesSource};

use super::QueryArgs;
use crate::output::{
    print_dashboard_markdown, print_dashboard_table, print_events_csv, print_json,
    print_series_csv, OutputFormat,
};

#[derive(Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Number of events to list (1-500)
    #[arg(long, default_value_t = DEFAULT_EVENT_LIMIT)]
    pub events: usize,

    /// Include the per-day series (with moving average and sentiment)
    #[arg(long)]
    pub series: bool,
}

pub async fn run(args: &SearchArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    let query = args.query.to_search_query(Utc::now().date_naive())?;
    let limit = validation::validate_event_limit(args.events)?;

    let snapshot = build_dashboard(client, &query, limit).await?;

    let metric = match snapshot.series_source {
        SeriesSource::Rows => snapshot.metric.to_string(),
        SeriesSource::Insights => "insights timeline".to_string(),
    };
    eprintln!(
        "{} via {} ({}), {}..{}",
        metric,
        snapshot.resolution.action,
        snapshot.granularity,
        query.from,
        query.to
    );
    for warning in &snapshot.warnings {
        eprintln!("warning: {}", warning);
    }

    match format {
        OutputFormat::Table => print_dashboard_table(&snapshot, args.series),
        OutputFormat::Json => print_json(&snapshot),
        OutputFormat::Csv if args.series => print_series_csv(&snapshot)?,
        OutputFormat::Csv => print_events_csv(&snapshot.events)?,
        OutputFormat::Markdown => print_dashboard_markdown(&snapshot, args.series),
    }

    Ok(())
}
