use std::collections::HashMap;

use anyhow::Result;
use gdeltpulse_lib::{DashboardSnapshot, EventRecord};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Tabled, Serialize)]
struct KpiRow {
    #[tabled(rename = "KPI")]
    #[serde(rename = "KPI")]
    name: String,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: String,
}

#[derive(Tabled, Serialize)]
struct SeriesRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: String,
    #[tabled(rename = "Moving Avg")]
    #[serde(rename = "Moving Avg")]
    moving_average: String,
    #[tabled(rename = "Sentiment")]
    #[serde(rename = "Sentiment")]
    sentiment: String,
}

#[derive(Tabled, Serialize)]
struct EventRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Tone")]
    #[serde(rename = "Tone")]
    tone: String,
    #[tabled(rename = "Impact")]
    #[serde(rename = "Impact")]
    impact: String,
    #[tabled(rename = "Source")]
    #[serde(rename = "Source")]
    source: String,
}

// -- Row builders --

fn build_kpi_rows(snapshot: &DashboardSnapshot) -> Vec<KpiRow> {
    let kpis = &snapshot.kpis;
    vec![
        KpiRow {
            name: "Volume".to_string(),
            value: format_volume(kpis.volume),
        },
        KpiRow {
            name: "Avg sentiment".to_string(),
            value: format!("{:.2}", kpis.sentiment_avg),
        },
        KpiRow {
            name: "vs previous period".to_string(),
            value: format_delta(kpis.delta_vs_prev),
        },
    ]
}

fn build_series_rows(snapshot: &DashboardSnapshot) -> Vec<SeriesRow> {
    let sentiment: HashMap<&str, f64> = snapshot
        .sentiment_series
        .iter()
        .map(|p| (p.date.as_str(), p.value))
        .collect();
    snapshot
        .series
        .iter()
        .zip(snapshot.moving_average.iter())
        .map(|(point, avg)| SeriesRow {
            date: point.date.clone(),
            value: format_number(point.value),
            moving_average: format!("{:.2}", avg.value),
            sentiment: format_optional(sentiment.get(point.date.as_str()).copied()),
        })
        .collect()
}

fn build_event_rows(events: &[EventRecord]) -> Vec<EventRow> {
    events
        .iter()
        .map(|e| EventRow {
            date: e.date.clone(),
            title: e.title.clone(),
            tone: format_optional(e.tone),
            impact: format_optional(e.impact),
            source: e.source.clone().unwrap_or_default(),
        })
        .collect()
}

fn dashboard_tables(snapshot: &DashboardSnapshot, with_series: bool) -> Vec<Table> {
    let mut tables = vec![Table::new(build_kpi_rows(snapshot))];
    if with_series {
        tables.push(Table::new(build_series_rows(snapshot)));
    }
    tables.push(Table::new(build_event_rows(&snapshot.events)));
    tables
}

// -- Table output --

pub fn print_dashboard_table(snapshot: &DashboardSnapshot, with_series: bool) {
    for table in dashboard_tables(snapshot, with_series) {
        println!("{}\n", table);
    }
}

// -- Markdown output --

pub fn print_dashboard_markdown(snapshot: &DashboardSnapshot, with_series: bool) {
    for mut table in dashboard_tables(snapshot, with_series) {
        table.with(Style::markdown());
        println!("{}\n", table);
    }
}

// -- CSV output --

pub fn print_series_csv(snapshot: &DashboardSnapshot) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_series_rows(snapshot) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_events_csv(events: &[EventRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_event_rows(events) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

fn format_volume(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format_number(value)
    }
}

/// Integral values without decimals, everything else to two places.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn format_delta(delta: f64) -> String {
    format!("{:+.1}%", delta * 100.0)
}

fn format_optional(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_default()
}
