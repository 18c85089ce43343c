//! HTTP client for the GDELT search proxy.

use std::time::Duration;

use url::Url;

use crate::{
    query::{GdeltRequest, Query},
    types::GdeltResponse,
    Error, UpstreamErrorKind,
};

/// Production proxy in front of the GDELT BigQuery tables.
pub const DEFAULT_BASE_URL: &str = "https://my-search-proxy.ew.r.appspot.com/gdelt";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// HTTP client for the GDELT search proxy.
///
/// Each request builds a fresh `reqwest::Client` with a 20-second timeout.
/// Retries belong to the caller (see the library layer's cached client).
pub struct Client {
    /// Base URL for the proxy. Versioned actions append `/v2` to it.
    base_api_url: String,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the production proxy.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The full URL `request` is sent to.
    pub fn request_url(&self, request: &GdeltRequest) -> Result<Url, Error> {
        let url = Url::parse(
            format!("{}{}", &self.base_api_url, request.api_version.path_suffix()).as_str(),
        )
        .map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })?;
        Ok(request.add_to_url(&url))
    }

    /// Sends `request` and decodes the payload.
    ///
    /// A 200 response whose body says `"status": "error"` is turned into
    /// [`Error::Upstream`] with the message classified.
    pub async fn search(&self, request: &GdeltRequest) -> Result<GdeltResponse, Error> {
        let url = self.request_url(request)?;
        tracing::debug!("GET {}", url);
        let client = reqwest::Client::builder()
            .user_agent(concat!("gdeltpulse/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        let resp = client
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let parsed = serde_json::from_str::<GdeltResponse>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::RequestFailed
        })?;

        if parsed.is_error() {
            let message = parsed.error_message().unwrap_or("Unknown error").to_string();
            let kind = UpstreamErrorKind::classify(&message);
            tracing::error!("Upstream reported {}: {}", kind, message);
            return Err(Error::Upstream { kind, message });
        }

        Ok(parsed)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SearchQuery;

    #[test]
    fn request_url_appends_version_suffix() {
        let client = Client::with_base_url("https://proxy.example.com/gdelt/");
        let req = SearchQuery::new("USA->CHN", "2025-01-01", "2025-01-31")
            .to_request()
            .unwrap();
        let url = client.request_url(&req).unwrap();
        assert_eq!(url.path(), "/gdelt/v2");

        let req = SearchQuery::new("USA CHN", "2025-01-01", "2025-01-31")
            .to_request()
            .unwrap();
        let url = client.request_url(&req).unwrap();
        assert_eq!(url.path(), "/gdelt");
    }

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate_body("short"), "short");
        let long = "é".repeat(1500);
        assert!(truncate_body(&long).ends_with("...[truncated]"));
    }
}
