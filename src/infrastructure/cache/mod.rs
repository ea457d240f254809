//! Caching layer for fast redirect lookups.
//!
//! [`RedirectCache`] applies the cache-aside policy on top of a
//! [`CacheBackend`], which has three implementations:
//! - [`RedisCache`] - Production Redis-backed cache
//! - [`MemoryCache`] - In-process cache for single-node deployments and tests
//! - [`NullCache`] - No-op implementation for disabled caching

mod memory_cache;
mod null_cache;
mod redirect_cache;
mod redis_cache;
mod service;

pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redirect_cache::{ALL_KEYS_PATTERN, CachedKey, KEY_PREFIX, RedirectCache, cache_key};
pub use redis_cache::RedisCache;
pub use service::{CacheBackend, CacheError, CacheResult, glob_match};

#[cfg(test)]
pub use service::MockCacheBackend;
