//! Write path: creating, renaming and retiring links.

use std::sync::Arc;

use tracing::{info, warn};

use super::alias_validator::{AliasError, AliasValidator, ValidAlias, normalize_alias};
use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::{FieldError, LinkError, StoreError};
use crate::infrastructure::cache::RedirectCache;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::url_validator::validate_url;

/// Input for [`LinkService::create_link`].
#[derive(Debug, Clone, Default)]
pub struct CreateLink {
    pub url: String,
    /// Operator-chosen code. Blank means "generate one".
    pub alias: Option<String>,
}

/// Input for [`LinkService::update_link`]. Absent or blank fields keep
/// their current value.
#[derive(Debug, Clone, Default)]
pub struct UpdateLink {
    pub url: Option<String>,
    pub alias: Option<String>,
}

/// Coordinates link mutations with redirect cache invalidation.
///
/// Every mutation that can change what a code resolves to invalidates the
/// affected cache keys after the store write commits.
#[derive(Clone)]
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
    cache: RedirectCache,
    generator: CodeGenerator,
    validator: AliasValidator,
}

impl LinkService {
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        cache: RedirectCache,
        validator: AliasValidator,
    ) -> Self {
        Self {
            generator: CodeGenerator::new(link_repository.clone()),
            link_repository,
            cache,
            validator,
        }
    }

    /// Validates the request and creates a link.
    ///
    /// # Errors
    ///
    /// [`LinkError::Validation`] lists every rejected field (URL and alias
    /// are both checked). Store failures surface as [`LinkError::Store`].
    pub async fn create_link(&self, request: CreateLink) -> Result<Link, LinkError> {
        let mut errors = Vec::new();

        let url = match validate_url(&request.url) {
            Ok(url) => Some(url),
            Err(e) => {
                errors.push(FieldError::new("url", e.to_string()));
                None
            }
        };

        let alias = match non_blank(request.alias.as_deref()) {
            Some(candidate) => self.check_alias(candidate, None, &mut errors).await?,
            None => None,
        };

        match url {
            Some(url) if errors.is_empty() => self.create(url, alias).await,
            _ => Err(LinkError::Validation(errors)),
        }
    }

    /// Validates the request and updates link `id`.
    ///
    /// An alias equal to the link's current code is left untouched and is
    /// not re-validated.
    pub async fn update_link(&self, id: i64, request: UpdateLink) -> Result<Link, LinkError> {
        let link = self.get_link(id).await?;
        let mut errors = Vec::new();

        let url = match non_blank(request.url.as_deref()) {
            Some(raw) => match validate_url(raw) {
                Ok(url) => Some(url),
                Err(e) => {
                    errors.push(FieldError::new("url", e.to_string()));
                    None
                }
            },
            None => None,
        };

        let alias = match non_blank(request.alias.as_deref()) {
            Some(candidate) if normalize_alias(candidate) == link.short_code => None,
            Some(candidate) => {
                self.check_alias(candidate, Some(link.id), &mut errors)
                    .await?
            }
            None => None,
        };

        if !errors.is_empty() {
            return Err(LinkError::Validation(errors));
        }

        if url.is_none() && alias.is_none() {
            return Ok(link);
        }

        self.rename_or_update(&link, url, alias).await
    }

    /// Deletes link `id` and drops its cache entry.
    pub async fn delete_link(&self, id: i64) -> Result<(), LinkError> {
        let link = self.get_link(id).await?;
        self.delete(&link).await
    }

    pub async fn get_link(&self, id: i64) -> Result<Link, LinkError> {
        self.link_repository
            .find_by_id(id)
            .await?
            .ok_or(LinkError::NotFound)
    }

    /// Lists links newest first. `page` starts at 1.
    pub async fn list_links(&self, page: i64, page_size: i64) -> Result<Vec<Link>, LinkError> {
        Ok(self.link_repository.list(page, page_size).await?)
    }

    pub async fn count_links(&self) -> Result<i64, LinkError> {
        Ok(self.link_repository.count().await?)
    }

    /// Persists a new link.
    ///
    /// With an alias, a lost race on the code is reported as the alias being
    /// taken. Without one, codes are generated until an insert succeeds.
    /// The cache is not written; the first resolution populates it.
    pub async fn create(&self, url: String, alias: Option<ValidAlias>) -> Result<Link, LinkError> {
        if let Some(alias) = alias {
            let code = alias.into_inner();
            let new_link = NewLink {
                short_code: code.clone(),
                original_url: url,
            };

            let link = self
                .link_repository
                .create(new_link)
                .await
                .map_err(|e| alias_taken_or(e, &code))?;

            info!(short_code = %link.short_code, id = link.id, "Link created");
            return Ok(link);
        }

        loop {
            let code = self.generator.generate().await?;
            let new_link = NewLink {
                short_code: code.clone(),
                original_url: url.clone(),
            };

            match self.link_repository.create(new_link).await {
                Ok(link) => {
                    info!(short_code = %link.short_code, id = link.id, "Link created");
                    return Ok(link);
                }
                Err(StoreError::CodeTaken(_)) => {
                    warn!(short_code = %code, "Generated code lost an insert race, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Applies a URL change and/or a rename in one store update, then
    /// invalidates the old code and, when it changed, the new one.
    pub async fn rename_or_update(
        &self,
        link: &Link,
        new_url: Option<String>,
        new_code: Option<ValidAlias>,
    ) -> Result<Link, LinkError> {
        let old_code = link.short_code.clone();
        let new_code = new_code
            .map(ValidAlias::into_inner)
            .filter(|code| *code != old_code);

        let patch = LinkPatch {
            original_url: new_url,
            short_code: new_code.clone(),
        };

        let updated = self
            .link_repository
            .update(link.id, patch)
            .await
            .map_err(|e| match &new_code {
                Some(code) => alias_taken_or(e, code),
                None => e.into(),
            })?;

        self.cache.invalidate(&old_code).await;
        if updated.short_code != old_code {
            self.cache.invalidate(&updated.short_code).await;
        }

        info!(
            id = updated.id,
            old_code = %old_code,
            short_code = %updated.short_code,
            "Link updated"
        );

        Ok(updated)
    }

    /// Invalidates the link's cache entry, deletes it from the store, then
    /// invalidates again.
    ///
    /// A resolver that missed the cache and read the row before the delete
    /// committed may have cached it again; the second invalidation drops it.
    pub async fn delete(&self, link: &Link) -> Result<(), LinkError> {
        self.cache.invalidate(&link.short_code).await;
        self.link_repository.delete(link.id).await?;
        self.cache.invalidate(&link.short_code).await;

        info!(id = link.id, short_code = %link.short_code, "Link deleted");
        Ok(())
    }

    /// Runs the alias validator, recording a rejection in `errors`.
    ///
    /// Only a store failure is returned as an error.
    async fn check_alias(
        &self,
        candidate: &str,
        exclude_id: Option<i64>,
        errors: &mut Vec<FieldError>,
    ) -> Result<Option<ValidAlias>, LinkError> {
        match self.validator.validate(candidate, exclude_id).await {
            Ok(alias) => Ok(Some(alias)),
            Err(AliasError::Store(e)) => Err(e.into()),
            Err(e) => {
                errors.push(FieldError::new("alias", e.to_string()));
                Ok(None)
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn alias_taken_or(e: StoreError, code: &str) -> LinkError {
    match e {
        StoreError::CodeTaken(_) => LinkError::Validation(vec![FieldError::new(
            "alias",
            AliasError::Taken(code.to_string()).to_string(),
        )]),
        other => other.into(),
    }
}
