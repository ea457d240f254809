//! In-process cache backend with per-key expiry.

use super::service::{CacheBackend, CacheResult, glob_match};
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;

struct Slot {
    value: String,
    expires_at: Instant,
}

/// Cache backend held in a concurrent map inside the process.
///
/// Expiry uses [`tokio::time::Instant`], so a paused test clock drives it.
/// Expired keys are dropped lazily on access and by [`MemoryCache::purge_expired`].
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, Slot>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every expired key. Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, slot| slot.expires_at > now);
        before - self.entries.len()
    }

    /// Number of stored keys, including expired keys not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn live(&self, key: &str) -> bool {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            Some(slot) => slot.expires_at <= now,
            None => return false,
        };
        if expired {
            self.entries.remove_if(key, |_, slot| slot.expires_at <= now);
            return false;
        }
        true
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        if !self.live(key) {
            return Ok(None);
        }
        Ok(self.entries.get(key).map(|slot| slot.value.clone()))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.entries.insert(
            key.to_string(),
            Slot {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<bool> {
        if !self.live(key) {
            return Ok(false);
        }
        match self.entries.get_mut(key) {
            Some(mut slot) => {
                slot.expires_at = Instant::now() + ttl;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        let live = self.live(key);
        Ok(self.entries.remove(key).is_some() && live)
    }

    async fn delete_matching(&self, pattern: &str) -> CacheResult<usize> {
        let now = Instant::now();
        let mut removed = 0;
        self.entries.retain(|key, slot| {
            if glob_match(pattern, key) {
                if slot.expires_at > now {
                    removed += 1;
                }
                false
            } else {
                true
            }
        });
        Ok(removed)
    }

    async fn scan_keys(&self, pattern: &str) -> CacheResult<Vec<String>> {
        let now = Instant::now();
        Ok(self
            .entries
            .iter()
            .filter(|e| e.value().expires_at > now && glob_match(pattern, e.key()))
            .map(|e| e.key().clone())
            .collect())
    }

    async fn ttl(&self, key: &str) -> CacheResult<Option<Duration>> {
        let now = Instant::now();
        Ok(self
            .entries
            .get(key)
            .filter(|slot| slot.expires_at > now)
            .map(|slot| slot.expires_at - now))
    }

    async fn ping(&self) -> CacheResult<()> {
        Ok(())
    }
}
