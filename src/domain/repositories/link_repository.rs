//! Repository trait for short link data access.

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::error::StoreError;
use async_trait::async_trait;

/// Durable record of code to URL mappings; the source of truth.
///
/// Implementations must enforce uniqueness of `short_code` at write time
/// and report a violation as [`StoreError::CodeTaken`]. Callers rely on this
/// constraint, not on prior existence checks, to settle concurrent writes.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - in-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CodeTaken`] if the short code is already used.
    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError>;

    /// Finds a link by exact short code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, StoreError>;

    /// Finds a link by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, StoreError>;

    /// Returns true if a live link other than `exclude_id` uses `code`.
    async fn exists_by_code(&self, code: &str, exclude_id: Option<i64>)
    -> Result<bool, StoreError>;

    /// Applies every field of `patch` in a single atomic write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no link has this id and
    /// [`StoreError::CodeTaken`] if the new code collides; in both cases
    /// nothing is changed.
    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Link, StoreError>;

    /// Removes a link.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no link has this id.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Lists links newest first.
    ///
    /// `page` is 1-indexed.
    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<Link>, StoreError>;

    /// Counts all links.
    async fn count(&self) -> Result<i64, StoreError>;
}
