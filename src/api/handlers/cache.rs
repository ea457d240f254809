//! Handlers for redirect cache maintenance.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;

use crate::api::dto::cache::{CacheClearResponse, CacheKeysResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists cached redirect keys with their remaining TTL.
///
/// # Endpoint
///
/// `GET /api/cache/keys`
///
/// # Errors
///
/// Returns 503 Service Unavailable if the cache backend can't be reached.
pub async fn cache_keys_handler(
    State(state): State<AppState>,
) -> Result<Json<CacheKeysResponse>, AppError> {
    let keys = state.cache.keys().await.map_err(|e| {
        AppError::unavailable(
            "Cache backend unavailable",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(Json(CacheKeysResponse {
        count: keys.len(),
        keys,
    }))
}

/// Removes every redirect cache key.
///
/// # Endpoint
///
/// `DELETE /api/cache`
///
/// Redirects keep working; the next resolution of each code reads the store.
pub async fn cache_clear_handler(State(state): State<AppState>) -> Json<CacheClearResponse> {
    let removed = state.cache.clear_all().await;
    tracing::info!(removed, "Redirect cache cleared");

    Json(CacheClearResponse { removed })
}

/// Drops the cached entry of one short code.
///
/// # Endpoint
///
/// `DELETE /api/cache/keys/{code}`
///
/// Succeeds whether or not the code was cached.
pub async fn cache_invalidate_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> StatusCode {
    state.cache.invalidate(&code).await;
    StatusCode::NO_CONTENT
}
