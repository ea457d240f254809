//! DTOs for the link management endpoints.

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{CreateLink, UpdateLink};
use crate::domain::ROOT_SENTINEL;
use crate::domain::entities::Link;
use crate::utils::request_meta::short_url;

/// Request body for `POST /api/links`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(max = 2048, message = "URL must be at most 2048 characters."))]
    pub url: String,

    /// Custom short code. Omitted or blank generates one.
    #[serde(default)]
    pub alias: Option<String>,
}

impl From<CreateLinkRequest> for CreateLink {
    fn from(req: CreateLinkRequest) -> Self {
        Self {
            url: req.url,
            alias: req.alias,
        }
    }
}

/// Request body for `PATCH /api/links/{id}`.
///
/// Only provided fields are changed.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(length(max = 2048, message = "URL must be at most 2048 characters."))]
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub alias: Option<String>,
}

impl From<UpdateLinkRequest> for UpdateLink {
    fn from(req: UpdateLinkRequest) -> Self {
        Self {
            url: req.url,
            alias: req.alias,
        }
    }
}

/// JSON representation of a link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(link: Link, base_url: Option<&str>, headers: &HeaderMap) -> Self {
        let path = if link.short_code == ROOT_SENTINEL {
            String::new()
        } else {
            link.short_code.clone()
        };

        Self {
            short_url: short_url(base_url, headers, &path),
            id: link.id,
            short_code: link.short_code,
            original_url: link.original_url,
            created_at: link.created_at,
        }
    }
}

/// Paginated link listing.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub items: Vec<LinkResponse>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}
