//! Caching and retrying wrapper around the API client.

use std::time::Duration;

use gdelt_api::types::GdeltResponse;
use gdelt_api::{Client, GdeltRequest, SearchQuery, UpstreamErrorKind, DEFAULT_BASE_URL};
use rand::Rng;
use url::Url;

use crate::cache::MemoryCache;
use crate::error::PulseError;

/// API client wrapper that adds an in-memory payload cache and retries.
///
/// Cache hits bypass the network entirely. Misses are retried with
/// exponential backoff and jitter on transient failures.
pub struct CachedClient {
    inner: Client,
    cache: MemoryCache,
    retry: RetryConfig,
}

/// Backoff settings for transient failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 500,
            max_delay_ms: 5000,
        }
    }
}

impl RetryConfig {
    /// Reads `GDELT_RETRY_MAX`, `GDELT_RETRY_BASE_MS` and `GDELT_RETRY_MAX_MS`,
    /// falling back to the defaults for unset or unparseable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_retries: env_usize("GDELT_RETRY_MAX", defaults.max_retries),
            base_delay_ms: env_u64("GDELT_RETRY_BASE_MS", defaults.base_delay_ms),
            max_delay_ms: env_u64("GDELT_RETRY_MAX_MS", defaults.max_delay_ms),
        }
    }

    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u64 << shift;
        let base = self
            .base_delay_ms
            .saturating_mul(exp)
            .min(self.max_delay_ms);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis((base as f64 * jitter) as u64)
    }
}

impl CachedClient {
    /// Creates a new cached client using the production proxy URL.
    pub fn new(cache: MemoryCache) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, cache)
    }

    /// Creates a new cached client with a custom base URL. Used for testing.
    pub fn with_base_url(base_url: &str, cache: MemoryCache) -> Self {
        Self {
            inner: Client::with_base_url(base_url),
            cache,
            retry: RetryConfig::from_env(),
        }
    }

    /// Builds a client from `GDELT_BASE_URL` and `GDELT_CACHE_TTL_SECS`.
    pub fn from_env() -> Self {
        let base_url = std::env::var("GDELT_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let ttl = Duration::from_secs(env_u64("GDELT_CACHE_TTL_SECS", 120));
        Self::with_base_url(&base_url, MemoryCache::new(ttl))
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_config(&self) -> RetryConfig {
        self.retry
    }

    async fn with_retry<T, F, Fut>(&self, label: &str, mut f: F) -> Result<T, PulseError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, PulseError>>,
    {
        let cfg = self.retry;
        let mut attempt = 0usize;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt > cfg.max_retries || !is_retryable(&err) {
                        return Err(err);
                    }
                    let delay = cfg.delay_for_attempt(attempt);
                    tracing::warn!(
                        "{} request failed (attempt {}/{}), retrying in {:.1}s",
                        label,
                        attempt,
                        cfg.max_retries,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// The URL `request` is sent to, which is also its cache key.
    pub fn request_url(&self, request: &GdeltRequest) -> Result<Url, PulseError> {
        Ok(self.inner.request_url(request)?)
    }

    /// Sends `request`, returning the cached payload when one is fresh.
    pub async fn search(&self, request: &GdeltRequest) -> Result<GdeltResponse, PulseError> {
        let cache_key = self.request_url(request)?.to_string();

        if let Some(cached) = self.cache.get(&cache_key) {
            tracing::debug!("Cache hit for {}", cache_key);
            return serde_json::from_str(&cached).map_err(|e| {
                PulseError::Cache(format!("unreadable payload for {}: {}", cache_key, e))
            });
        }

        let label = request.action.to_string();
        let resp = self
            .with_retry(&label, || async { Ok(self.inner.search(request).await?) })
            .await?;
        if let Ok(json) = serde_json::to_string(&resp) {
            self.cache.set(cache_key, json);
        }
        Ok(resp)
    }

    /// Classifies, resolves and sends a search in one go.
    pub async fn search_query(&self, query: &SearchQuery) -> Result<GdeltResponse, PulseError> {
        let request = query.to_request()?;
        self.search(&request).await
    }

    /// Removes all entries from the cache.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

/// HTTP statuses worth another attempt.
const RETRYABLE_STATUSES: [u16; 6] = [408, 429, 500, 502, 503, 504];

fn is_retryable(err: &PulseError) -> bool {
    match err {
        PulseError::Api(api_err) => match api_err {
            gdelt_api::Error::RequestFailed => true,
            gdelt_api::Error::HttpStatus { status, .. } => RETRYABLE_STATUSES.contains(status),
            gdelt_api::Error::Upstream { kind, .. } => *kind == UpstreamErrorKind::RateLimited,
            gdelt_api::Error::InvalidQuery(_) => false,
        },
        _ => false,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(default)
}
