//! Error types for the library layer.

use std::fmt;

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding cache, serialization, and input validation failures.
#[derive(Debug)]
pub enum PulseError {
    /// An error from the underlying API client.
    Api(gdelt_api::Error),
    /// A cached payload could not be read back.
    Cache(String),
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for PulseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::Cache(msg) => write!(f, "Cache error: {}", msg),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for PulseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<gdelt_api::Error> for PulseError {
    fn from(e: gdelt_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<serde_json::Error> for PulseError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}

impl PulseError {
    /// HTTP status a front-end proxy should answer with for this error.
    ///
    /// Bad input and upstream parameter errors map to 400, throttling to 429,
    /// everything else to 502.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::Api(gdelt_api::Error::InvalidQuery(_)) => 400,
            Self::Api(gdelt_api::Error::Upstream { kind, .. }) => kind.status_code(),
            Self::Api(gdelt_api::Error::HttpStatus { status: 429, .. }) => 429,
            _ => 502,
        }
    }
}
