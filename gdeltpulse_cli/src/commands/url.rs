use anyhow::Result;
use chrono::Utc;
use clap::Args;
use gdeltpulse_lib::CachedClient;
use serde::Serialize;

use super::QueryArgs;
use crate::output::{print_json, OutputFormat};

#[derive(Args)]
pub struct UrlArgs {
    #[command(flatten)]
    pub query: QueryArgs,
}

#[derive(Serialize)]
struct ResolvedRequest {
    url: String,
    action: String,
    api_version: u8,
    tokens: Vec<String>,
}

pub fn run(args: &UrlArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    let query = args.query.to_search_query(Utc::now().date_naive())?;
    let resolution = query.resolve();
    let request = query.to_request()?;
    let url = client.request_url(&request)?;

    match format {
        OutputFormat::Json => print_json(&ResolvedRequest {
            url: url.to_string(),
            action: resolution.action.to_string(),
            api_version: resolution.api_version as u8,
            tokens: resolution.tokens,
        }),
        _ => println!("{}", url),
    }

    Ok(())
}
