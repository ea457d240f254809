//! Read path: short code to destination URL.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ROOT_SENTINEL;
use crate::domain::repositories::LinkRepository;
use crate::domain::visit::{Visit, VisitContext};
use crate::error::LinkError;
use crate::infrastructure::analytics::VisitNotifier;
use crate::infrastructure::cache::RedirectCache;

/// Where a destination was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    Cache,
    Store,
}

/// Result of resolving a short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Redirect {
        url: String,
        source: ResolutionSource,
    },
    NotFound,
}

/// Cache-aside resolver.
///
/// A hit re-arms the cache TTL. A miss reads the store and populates the
/// cache. Every successful resolution hands a [`Visit`] to the notifier
/// without waiting for it.
#[derive(Clone)]
pub struct ResolutionService {
    link_repository: Arc<dyn LinkRepository>,
    cache: RedirectCache,
    notifier: Arc<dyn VisitNotifier>,
}

impl ResolutionService {
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        cache: RedirectCache,
        notifier: Arc<dyn VisitNotifier>,
    ) -> Self {
        Self {
            link_repository,
            cache,
            notifier,
        }
    }

    /// Resolves `short_code` to its destination.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Store`] only when the cache missed and the store
    /// lookup failed. Cache trouble alone never fails a resolution.
    pub async fn resolve(
        &self,
        short_code: &str,
        context: &VisitContext,
    ) -> Result<Resolution, LinkError> {
        if let Some(entry) = self.cache.get(short_code).await {
            self.cache.touch(short_code).await;
            self.notifier
                .notify(Visit::new(short_code, &entry.url, context));

            return Ok(Resolution::Redirect {
                url: entry.url,
                source: ResolutionSource::Cache,
            });
        }

        let Some(link) = self.link_repository.find_by_code(short_code).await? else {
            debug!(short_code, "Short code not found");
            return Ok(Resolution::NotFound);
        };

        self.cache.put(&link).await;
        self.notifier
            .notify(Visit::new(short_code, &link.original_url, context));

        Ok(Resolution::Redirect {
            url: link.original_url,
            source: ResolutionSource::Store,
        })
    }

    /// Resolves the site root, falling back to `default_destination`.
    pub async fn resolve_root(
        &self,
        context: &VisitContext,
        default_destination: &str,
    ) -> Result<String, LinkError> {
        match self.resolve(ROOT_SENTINEL, context).await? {
            Resolution::Redirect { url, .. } => Ok(url),
            Resolution::NotFound => Ok(default_destination.to_string()),
        }
    }
}
