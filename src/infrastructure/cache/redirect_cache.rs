//! Best-effort redirect cache in front of the link store.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use super::service::{CacheBackend, CacheError, CacheResult};
use crate::domain::entities::{CacheEntry, Link};

/// Namespace prefix for redirect cache keys.
pub const KEY_PREFIX: &str = "shortener:url:";

/// Pattern covering every redirect cache key.
pub const ALL_KEYS_PATTERN: &str = "shortener:url:*";

/// Builds the cache key for a short code.
pub fn cache_key(short_code: &str) -> String {
    format!("{}{}", KEY_PREFIX, short_code)
}

/// A cached key as reported to operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedKey {
    pub key: String,
    pub short_code: String,
    /// Remaining lifetime in seconds; `None` if the key vanished or has no expiry.
    pub ttl_seconds: Option<u64>,
}

/// Cache-aside accessor with a sliding TTL.
///
/// Every backend call is bounded by `timeout`. Failures of any kind are
/// logged and swallowed: a read failure is a miss and a write failure is a
/// write that never happened. Redirect availability therefore never
/// depends on the cache backend.
#[derive(Clone)]
pub struct RedirectCache {
    backend: Arc<dyn CacheBackend>,
    ttl: Duration,
    timeout: Duration,
}

impl RedirectCache {
    pub fn new(backend: Arc<dyn CacheBackend>, ttl: Duration, timeout: Duration) -> Self {
        Self {
            backend,
            ttl,
            timeout,
        }
    }

    /// TTL applied on insert and on every hit.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    async fn bounded<T>(&self, op: impl Future<Output = CacheResult<T>>) -> CacheResult<T> {
        match tokio::time::timeout(self.timeout, op).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(self.timeout)),
        }
    }

    /// Looks up the cached entry for `short_code`.
    pub async fn get(&self, short_code: &str) -> Option<CacheEntry> {
        let key = cache_key(short_code);
        match self.bounded(self.backend.get(&key)).await {
            Ok(Some(raw)) => match serde_json::from_str::<CacheEntry>(&raw) {
                Ok(entry) => {
                    debug!(short_code, "Cache HIT");
                    Some(entry)
                }
                Err(e) => {
                    warn!(short_code, error = %e, "Discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => {
                debug!(short_code, "Cache MISS");
                None
            }
            Err(e) => {
                debug!(short_code, error = %e, "Cache get failed, treating as miss");
                None
            }
        }
    }

    /// Caches `link` under its current short code.
    pub async fn put(&self, link: &Link) {
        let entry = CacheEntry::from_link(link);
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(short_code = %link.short_code, error = %e, "Failed to encode cache entry");
                return;
            }
        };

        let key = cache_key(&link.short_code);
        match self.bounded(self.backend.set_ex(&key, &raw, self.ttl)).await {
            Ok(()) => debug!(short_code = %link.short_code, ttl = ?self.ttl, "Cache SET"),
            Err(e) => debug!(short_code = %link.short_code, error = %e, "Cache set failed"),
        }
    }

    /// Re-arms the TTL of a cached code.
    pub async fn touch(&self, short_code: &str) {
        let key = cache_key(short_code);
        if let Err(e) = self.bounded(self.backend.expire(&key, self.ttl)).await {
            debug!(short_code, error = %e, "Cache touch failed");
        }
    }

    /// Drops the cached entry for `short_code`. A missing entry is a no-op.
    pub async fn invalidate(&self, short_code: &str) {
        let key = cache_key(short_code);
        match self.bounded(self.backend.delete(&key)).await {
            Ok(true) => debug!(short_code, "Cache INVALIDATE"),
            Ok(false) => {}
            Err(e) => warn!(short_code, error = %e, "Cache delete failed"),
        }
    }

    /// Removes every key matching `pattern`. Returns how many were removed,
    /// or 0 if the backend failed.
    pub async fn clear_matching(&self, pattern: &str) -> usize {
        match self.bounded(self.backend.delete_matching(pattern)).await {
            Ok(removed) => {
                debug!(pattern, removed, "Cache bulk clear");
                removed
            }
            Err(e) => {
                warn!(pattern, error = %e, "Cache bulk clear failed");
                0
            }
        }
    }

    /// Removes every redirect cache key.
    pub async fn clear_all(&self) -> usize {
        self.clear_matching(ALL_KEYS_PATTERN).await
    }

    /// Lists cached redirect keys for operator inspection.
    ///
    /// Unlike the redirect path this reports backend failures, so an operator
    /// can tell an empty cache from an unreachable one.
    ///
    /// # Errors
    ///
    /// Returns the backend error or [`CacheError::Timeout`].
    pub async fn keys(&self) -> CacheResult<Vec<CachedKey>> {
        let mut keys = self
            .bounded(self.backend.scan_keys(ALL_KEYS_PATTERN))
            .await?;
        keys.sort();

        let mut listed = Vec::with_capacity(keys.len());
        for key in keys {
            let ttl = self.bounded(self.backend.ttl(&key)).await?;
            let short_code = key.strip_prefix(KEY_PREFIX).unwrap_or(&key).to_string();
            listed.push(CachedKey {
                key,
                short_code,
                ttl_seconds: ttl.map(|d| d.as_secs()),
            });
        }
        Ok(listed)
    }

    /// Checks if the cache backend answers within the timeout.
    pub async fn health_check(&self) -> bool {
        self.bounded(self.backend.ping()).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::MemoryCache;
    use crate::infrastructure::cache::MockCacheBackend;
    use chrono::Utc;

    const TTL: Duration = Duration::from_secs(60);
    const TIMEOUT: Duration = Duration::from_millis(100);

    fn link(code: &str, url: &str) -> Link {
        Link::new(1, code.to_string(), url.to_string(), Utc::now())
    }

    fn memory() -> (Arc<MemoryCache>, RedirectCache) {
        let backend = Arc::new(MemoryCache::new());
        let cache = RedirectCache::new(backend.clone(), TTL, TIMEOUT);
        (backend, cache)
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_then_get() {
        let (backend, cache) = memory();
        cache.put(&link("abc123", "https://example.org")).await;

        let entry = cache.get("abc123").await.unwrap();
        assert_eq!(entry.url, "https://example.org");
        assert_eq!(entry.id, 1);
        assert!(
            backend
                .get("shortener:url:abc123")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_missing_is_noop() {
        let (_, cache) = memory();
        cache.invalidate("never-cached").await;
        cache.invalidate("never-cached").await;
        assert!(cache.get("never-cached").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_touch_keeps_entry_alive() {
        let (_, cache) = memory();
        cache.put(&link("hot", "https://example.org")).await;

        for _ in 0..5 {
            tokio::time::advance(Duration::from_secs(45)).await;
            cache.touch("hot").await;
        }

        assert!(cache.get("hot").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_untouched_entry_expires() {
        let (_, cache) = memory();
        cache.put(&link("cold", "https://example.org")).await;

        tokio::time::advance(TTL + Duration::from_secs(1)).await;

        assert!(cache.get("cold").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_undecodable_entry_is_miss() {
        let (backend, cache) = memory();
        backend
            .set_ex("shortener:url:bad", "not json", TTL)
            .await
            .unwrap();

        assert!(cache.get("bad").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_and_clear_all() {
        let (backend, cache) = memory();
        cache.put(&link("a", "https://a.example")).await;
        cache.put(&link("b", "https://b.example")).await;
        backend.set_ex("unrelated", "x", TTL).await.unwrap();

        let keys = cache.keys().await.unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].short_code, "a");
        assert_eq!(keys[0].key, "shortener:url:a");
        assert_eq!(keys[0].ttl_seconds, Some(60));

        assert_eq!(cache.clear_all().await, 2);
        assert!(cache.keys().await.unwrap().is_empty());
        assert!(backend.get("unrelated").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_backend_errors_are_swallowed() {
        let mut backend = MockCacheBackend::new();
        backend
            .expect_get()
            .returning(|_| Err(CacheError::ConnectionError("refused".into())));
        backend
            .expect_set_ex()
            .returning(|_, _, _| Err(CacheError::ConnectionError("refused".into())));
        backend
            .expect_expire()
            .returning(|_, _| Err(CacheError::ConnectionError("refused".into())));
        backend
            .expect_delete()
            .returning(|_| Err(CacheError::ConnectionError("refused".into())));
        backend
            .expect_delete_matching()
            .returning(|_| Err(CacheError::ConnectionError("refused".into())));
        backend
            .expect_ping()
            .returning(|| Err(CacheError::ConnectionError("refused".into())));

        let cache = RedirectCache::new(Arc::new(backend), TTL, TIMEOUT);

        assert!(cache.get("abc123").await.is_none());
        cache.put(&link("abc123", "https://example.org")).await;
        cache.touch("abc123").await;
        cache.invalidate("abc123").await;
        assert_eq!(cache.clear_all().await, 0);
        assert!(!cache.health_check().await);
    }

    #[tokio::test]
    async fn test_keys_reports_backend_error() {
        let mut backend = MockCacheBackend::new();
        backend
            .expect_scan_keys()
            .returning(|_| Err(CacheError::ConnectionError("refused".into())));

        let cache = RedirectCache::new(Arc::new(backend), TTL, TIMEOUT);

        assert!(matches!(
            cache.keys().await,
            Err(CacheError::ConnectionError(_))
        ));
    }
}
