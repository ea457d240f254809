//! In-process link repository.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::StoreError;

#[derive(Default)]
struct Inner {
    next_id: i64,
    links: HashMap<i64, Link>,
    /// Unique index: short code to link id.
    codes: HashMap<String, i64>,
}

/// Link repository kept in memory.
///
/// Intended for development and tests. A single mutex serializes writes,
/// which gives the same uniqueness guarantee as a database constraint. The
/// lock is never held across an `.await`.
#[derive(Default)]
pub struct MemoryLinkRepository {
    inner: Mutex<Inner>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError> {
        let mut inner = self.lock();
        if inner.codes.contains_key(&new_link.short_code) {
            return Err(StoreError::CodeTaken(new_link.short_code));
        }

        inner.next_id += 1;
        let link = Link::new(
            inner.next_id,
            new_link.short_code,
            new_link.original_url,
            Utc::now(),
        );
        inner.codes.insert(link.short_code.clone(), link.id);
        inner.links.insert(link.id, link.clone());
        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .codes
            .get(code)
            .and_then(|id| inner.links.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, StoreError> {
        Ok(self.lock().links.get(&id).cloned())
    }

    async fn exists_by_code(
        &self,
        code: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, StoreError> {
        let inner = self.lock();
        Ok(inner
            .codes
            .get(code)
            .is_some_and(|id| Some(*id) != exclude_id))
    }

    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Link, StoreError> {
        let mut inner = self.lock();
        let mut updated = inner.links.get(&id).cloned().ok_or(StoreError::NotFound)?;
        let old_code = updated.short_code.clone();

        if let Some(code) = &patch.short_code
            && inner.codes.get(code).is_some_and(|owner| *owner != id)
        {
            return Err(StoreError::CodeTaken(code.clone()));
        }

        patch.apply_to(&mut updated);
        if updated.short_code != old_code {
            inner.codes.remove(&old_code);
            inner.codes.insert(updated.short_code.clone(), id);
        }
        inner.links.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let link = inner.links.remove(&id).ok_or(StoreError::NotFound)?;
        inner.codes.remove(&link.short_code);
        Ok(())
    }

    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<Link>, StoreError> {
        let inner = self.lock();
        let mut links: Vec<Link> = inner.links.values().cloned().collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let offset = usize::try_from((page - 1).max(0) * page_size).unwrap_or(usize::MAX);
        let limit = usize::try_from(page_size.max(0)).unwrap_or(0);
        Ok(links.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.lock().links.len() as i64)
    }
}
