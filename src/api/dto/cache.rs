//! DTOs for the redirect cache maintenance endpoints.

use serde::Serialize;

use crate::infrastructure::cache::CachedKey;

/// Response of `GET /api/cache/keys`.
#[derive(Debug, Serialize)]
pub struct CacheKeysResponse {
    pub count: usize,
    pub keys: Vec<CachedKey>,
}

/// Response of `DELETE /api/cache`.
#[derive(Debug, Serialize)]
pub struct CacheClearResponse {
    pub removed: usize,
}
