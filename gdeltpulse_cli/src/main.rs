mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gdeltpulse_lib::CachedClient;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "gdeltpulse")]
#[command(about = "Query and summarize GDELT news coverage")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a search and print its KPIs, series and top events
    Search(commands::search::SearchArgs),
    /// Print the upstream request URL for a search without sending it
    Url(commands::url::UrlArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gdeltpulse=info".parse()?)
                .add_directive("gdelt_api=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    let client = CachedClient::from_env();

    match &cli.command {
        Commands::Search(args) => commands::search::run(args, &client, &format).await?,
        Commands::Url(args) => commands::url::run(args, &client, &format)?,
    }

    Ok(())
}
