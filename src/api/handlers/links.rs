//! Handlers for link management endpoints (list, create, read, update, delete).

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::links::{
    CreateLinkRequest, LinkListResponse, LinkResponse, UpdateLinkRequest,
};
use crate::api::dto::pagination::PaginationParams;
use crate::error::AppError;
use crate::state::AppState;

/// Lists links, newest first.
///
/// # Endpoint
///
/// `GET /api/links?page=1&page_size=25`
///
/// # Errors
///
/// Returns 400 Bad Request for an invalid page or page size.
pub async fn links_list_handler(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    headers: HeaderMap,
) -> Result<Json<LinkListResponse>, AppError> {
    let (page, page_size) = params
        .validate_and_get_page()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let links = state.link_service.list_links(page, page_size).await?;
    let total = state.link_service.count_links().await?;

    let base_url = state.settings.public_base_url.as_deref();
    let items = links
        .into_iter()
        .map(|link| LinkResponse::new(link, base_url, &headers))
        .collect();

    Ok(Json(LinkListResponse {
        items,
        page,
        page_size,
        total,
    }))
}

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/landing", "alias": "promo" }
/// ```
///
/// `alias` is optional; without it a 6-character code is generated.
///
/// # Errors
///
/// Returns 400 Bad Request with every rejected field in `details.errors`.
pub async fn create_link_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state.link_service.create_link(payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::new(
            link,
            state.settings.public_base_url.as_deref(),
            &headers,
        )),
    ))
}

/// Returns one link.
///
/// # Endpoint
///
/// `GET /api/links/{id}`
pub async fn get_link_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_link(id).await?;

    Ok(Json(LinkResponse::new(
        link,
        state.settings.public_base_url.as_deref(),
        &headers,
    )))
}

/// Changes a link's destination and/or short code.
///
/// # Endpoint
///
/// `PATCH /api/links/{id}`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/new", "alias": "promo2" }
/// ```
///
/// Both fields are optional. Either change drops the affected cache
/// entries, so the next redirect reads the new mapping.
///
/// # Errors
///
/// Returns 404 Not Found if the link doesn't exist.
/// Returns 400 Bad Request with every rejected field in `details.errors`.
pub async fn update_link_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let link = state.link_service.update_link(id, payload.into()).await?;

    Ok(Json(LinkResponse::new(
        link,
        state.settings.public_base_url.as_deref(),
        &headers,
    )))
}

/// Deletes a link and its cache entry.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the link doesn't exist.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_link(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
