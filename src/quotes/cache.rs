//! TTL cache for quote responses
//!
//! Each entry is keyed by the request URL, which already encodes the source
//! and its parameters. Entries expire after a fixed TTL; expired entries are
//! dropped lazily on lookup. The cache is an owned component injected into
//! the quote client, never global state.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

struct CacheEntry {
    body: serde_json::Value,
    fetched_at: Instant,
}

pub struct QuoteCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl QuoteCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Return the cached body for `key` if it has not expired.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(key)?;
        if entry.fetched_at.elapsed() < self.ttl {
            Some(entry.body.clone())
        } else {
            None
        }
    }

    pub fn put(&self, key: String, body: serde_json::Value) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                key,
                CacheEntry {
                    body,
                    fetched_at: Instant::now(),
                },
            );
        }
    }

    /// Drop everything, forcing fresh fetches on the next cycle.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hit_before_ttl() {
        let cache = QuoteCache::new(Duration::from_secs(60));
        cache.put("oficial".into(), json!({"venta": 1000.0}));
        assert_eq!(cache.get("oficial"), Some(json!({"venta": 1000.0})));
    }

    #[test]
    fn test_miss_after_expiry() {
        let cache = QuoteCache::new(Duration::ZERO);
        cache.put("oficial".into(), json!({"venta": 1000.0}));
        assert_eq!(cache.get("oficial"), None);
    }

    #[test]
    fn test_keys_are_independent() {
        let cache = QuoteCache::new(Duration::from_secs(60));
        cache.put("a".into(), json!(1));
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_clear() {
        let cache = QuoteCache::new(Duration::from_secs(60));
        cache.put("a".into(), json!(1));
        cache.clear();
        assert_eq!(cache.get("a"), None);
    }
}
