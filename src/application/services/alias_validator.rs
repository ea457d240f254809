//! Validation of operator-supplied aliases.

use std::sync::Arc;

use crate::domain::repositories::LinkRepository;
use crate::domain::route_oracle::{REDIRECT_ROUTE, RouteOracle};
use crate::domain::{MAX_CODE_LENGTH, ROOT_SENTINEL};
use crate::error::StoreError;

/// Literal path segments of non-redirect routes. Compared case-insensitively.
pub const RESERVED_ALIASES: &[&str] = &[
    "links", "login", "logout", "create", "delete", "settings", "admin", "static", "cache",
    "users", "api", "health",
];

/// Prefixes of multi-segment system routes. Compared case-insensitively.
pub const RESERVED_PREFIXES: &[&str] = &[
    "settings/", "delete/", "users/", "cache/", "links/", "api/",
];

/// Reasons an alias is rejected.
#[derive(Debug, thiserror::Error)]
pub enum AliasError {
    #[error("Alias is required.")]
    Required,

    #[error("Alias '{0}' is longer than 15 characters.")]
    TooLong(String),

    #[error("Alias '{0}' is reserved and cannot be used.")]
    Reserved(String),

    /// Redirects match a single path segment, so such a code never resolves.
    #[error("Alias '{0}' cannot contain '/'.")]
    PathSeparator(String),

    #[error("Alias '{0}' conflicts with a system URL.")]
    Conflict(String),

    #[error("Alias '{0}' is already taken.")]
    Taken(String),

    /// The uniqueness check could not be performed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// An alias that passed [`AliasValidator::validate`], already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidAlias(String);

impl ValidAlias {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns true for the site root sentinel.
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_SENTINEL
    }

    #[cfg(test)]
    pub(crate) fn new_unchecked(alias: &str) -> Self {
        Self(alias.to_string())
    }
}

/// Canonicalizes the ways of writing the site root to [`ROOT_SENTINEL`].
pub fn normalize_alias(alias: &str) -> &str {
    match alias {
        "/" | ROOT_SENTINEL => ROOT_SENTINEL,
        other => other,
    }
}

/// Decides whether an alias may be stored.
///
/// The store check here is advisory. Under concurrency the store's
/// uniqueness constraint decides, see
/// [`crate::application::services::LinkService`].
#[derive(Clone)]
pub struct AliasValidator {
    link_repository: Arc<dyn LinkRepository>,
    routes: Arc<dyn RouteOracle>,
}

impl AliasValidator {
    pub fn new(link_repository: Arc<dyn LinkRepository>, routes: Arc<dyn RouteOracle>) -> Self {
        Self {
            link_repository,
            routes,
        }
    }

    /// Validates `candidate`, ignoring the link `exclude_id` in the
    /// uniqueness check.
    ///
    /// Checks run in order and stop at the first failure: presence,
    /// normalization, length, reserved words, reserved prefixes, path
    /// separators, system route conflicts, then existing links.
    ///
    /// # Errors
    ///
    /// Returns the [`AliasError`] for the first failed check, or
    /// [`AliasError::Store`] if the uniqueness lookup failed.
    pub async fn validate(
        &self,
        candidate: &str,
        exclude_id: Option<i64>,
    ) -> Result<ValidAlias, AliasError> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            return Err(AliasError::Required);
        }

        let normalized = normalize_alias(trimmed);

        if normalized.chars().count() > MAX_CODE_LENGTH {
            return Err(AliasError::TooLong(normalized.to_string()));
        }

        let lowered = normalized.to_lowercase();
        if RESERVED_ALIASES.contains(&lowered.as_str()) {
            return Err(AliasError::Reserved(normalized.to_string()));
        }

        if RESERVED_PREFIXES
            .iter()
            .any(|prefix| lowered.starts_with(prefix))
        {
            return Err(AliasError::Reserved(normalized.to_string()));
        }

        if normalized.contains('/') {
            return Err(AliasError::PathSeparator(normalized.to_string()));
        }

        if normalized != ROOT_SENTINEL
            && let Some(route) = self.routes.resolve(&format!("/{}/", normalized))
            && route != REDIRECT_ROUTE
        {
            return Err(AliasError::Conflict(normalized.to_string()));
        }

        if self
            .link_repository
            .exists_by_code(normalized, exclude_id)
            .await?
        {
            return Err(AliasError::Taken(normalized.to_string()));
        }

        Ok(ValidAlias(normalized.to_string()))
    }
}
