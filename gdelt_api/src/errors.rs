//! Error types for the API client.

use std::fmt;

/// Errors that can occur when building or sending GDELT requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, timeout, or unparseable response).
    #[error("Request failed")]
    RequestFailed,
    /// The proxy returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The proxy answered 200 but the payload carried `"status": "error"`.
    #[error("Upstream rejected the request ({kind}): {message}")]
    Upstream {
        kind: UpstreamErrorKind,
        message: String,
    },
    /// A request could not be assembled from the resolved mode.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// Coarse classification of an upstream error message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    /// Bad or missing parameters, e.g. a daily range over 365 days.
    InvalidRequest,
    /// The upstream is throttling us.
    RateLimited,
    Other,
}

impl UpstreamErrorKind {
    /// Classifies an upstream message by keyword.
    pub fn classify(message: &str) -> Self {
        let normalized = message.to_lowercase();
        if normalized.contains("invalid")
            || normalized.contains("missing")
            || normalized.contains("parameter")
        {
            return UpstreamErrorKind::InvalidRequest;
        }
        if normalized.contains("rate limit") || normalized.contains("too many") {
            return UpstreamErrorKind::RateLimited;
        }
        UpstreamErrorKind::Other
    }

    /// The HTTP status a proxy in front of this client would answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            UpstreamErrorKind::InvalidRequest => 400,
            UpstreamErrorKind::RateLimited => 429,
            UpstreamErrorKind::Other => 502,
        }
    }
}

impl fmt::Display for UpstreamErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                UpstreamErrorKind::InvalidRequest => "invalid request",
                UpstreamErrorKind::RateLimited => "rate limited",
                UpstreamErrorKind::Other => "upstream error",
            }
        )
    }
}
