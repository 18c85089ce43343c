//! In-memory TTL cache of upstream payloads, keyed by request URL.

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// How long a payload stays fresh when nothing else is configured.
pub const DEFAULT_TTL: Duration = Duration::from_secs(120);

struct CachedPayload {
    body: String,
    expires_at: Instant,
}

/// Thread-safe payload cache with time-to-live expiration.
///
/// Payloads are stored as serialized JSON under the full request URL, so two
/// searches that build the same URL share an entry. Expired entries are
/// lazily evicted on the next `get` for that URL.
pub struct MemoryCache {
    store: DashMap<String, CachedPayload>,
    ttl: Duration,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            store: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the payload cached for `url`, or `None` if missing or expired.
    pub fn get(&self, url: &str) -> Option<String> {
        let entry = self.store.get(url)?;
        if Instant::now() > entry.expires_at {
            drop(entry);
            self.store.remove(url);
            return None;
        }
        Some(entry.body.clone())
    }

    /// Inserts or overwrites the payload for `url`. A zero TTL disables caching.
    pub fn set(&self, url: String, body: String) {
        if self.ttl.is_zero() {
            return;
        }
        self.store.insert(
            url,
            CachedPayload {
                body,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn clear(&self) {
        self.store.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://proxy.example.com/gdelt/v2?action=context";

    #[test]
    fn set_and_get() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set(URL.to_string(), r#"{"data":[]}"#.to_string());
        assert_eq!(cache.get(URL).as_deref(), Some(r#"{"data":[]}"#));
        assert_eq!(cache.get("https://proxy.example.com/gdelt"), None);
    }

    #[test]
    fn entries_expire() {
        let cache = MemoryCache::new(Duration::from_millis(1));
        cache.set(URL.to_string(), "{}".to_string());
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(cache.get(URL), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn overwrite_and_clear() {
        let cache = MemoryCache::default();
        assert_eq!(cache.ttl(), DEFAULT_TTL);
        cache.set(URL.to_string(), "old".to_string());
        cache.set(URL.to_string(), "new".to_string());
        assert_eq!(cache.get(URL).as_deref(), Some("new"));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert_eq!(cache.get(URL), None);
    }

    #[test]
    fn zero_ttl_disables_caching() {
        let cache = MemoryCache::new(Duration::ZERO);
        cache.set(URL.to_string(), "{}".to_string());
        assert!(cache.is_empty());
    }
}
