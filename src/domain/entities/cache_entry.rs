//! Cached copy of a link used on the redirect fast path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Link;

/// Denormalized link data stored in the redirect cache.
///
/// `id` is kept for diagnostics only; correctness relies on `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub url: String,
    pub id: i64,
    pub cached_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Snapshots a link at the current wall-clock time.
    pub fn from_link(link: &Link) -> Self {
        Self {
            url: link.original_url.clone(),
            id: link.id,
            cached_at: Utc::now(),
        }
    }
}
