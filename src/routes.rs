//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET    /`                      - Site root redirect
//! - `GET    /health`                - Store and cache health
//! - `GET    /api/links`             - List links (paginated)
//! - `POST   /api/links`             - Create a link
//! - `GET    /api/links/{id}`        - Fetch a link
//! - `PATCH  /api/links/{id}`        - Change destination and/or code
//! - `DELETE /api/links/{id}`        - Delete a link
//! - `GET    /api/cache/keys`        - Cached redirect keys with TTL
//! - `DELETE /api/cache`             - Clear every redirect cache key
//! - `DELETE /api/cache/keys/{code}` - Drop one cached code
//! - `GET    /{code}`                - Short link redirect
//!
//! The same table answers [`RouteOracle`] queries, so an alias can never
//! shadow a route registered here.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::{
    cache_clear_handler, cache_invalidate_handler, cache_keys_handler, create_link_handler,
    delete_link_handler, get_link_handler, health_handler, links_list_handler,
    redirect_handler, root_redirect_handler, update_link_handler,
};
use crate::api::middleware::tracing;
use crate::domain::route_oracle::{REDIRECT_ROUTE, RouteOracle};
use crate::state::AppState;
use axum::Router;
use axum::routing::{delete, get};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

pub const ROOT_PATH: &str = "/";
pub const HEALTH_PATH: &str = "/health";
pub const LINKS_PATH: &str = "/api/links";
pub const LINK_PATH: &str = "/api/links/{id}";
pub const CACHE_PATH: &str = "/api/cache";
pub const CACHE_KEYS_PATH: &str = "/api/cache/keys";
pub const CACHE_KEY_PATH: &str = "/api/cache/keys/{code}";
pub const REDIRECT_PATH: &str = "/{code}";

/// Named path patterns, most specific first. The catch-all redirect route
/// must stay last.
const ROUTES: &[(&str, &str)] = &[
    ("root", ROOT_PATH),
    ("health", HEALTH_PATH),
    ("links", LINKS_PATH),
    ("link", LINK_PATH),
    ("cache", CACHE_PATH),
    ("cache_keys", CACHE_KEYS_PATH),
    ("cache_key", CACHE_KEY_PATH),
    (REDIRECT_ROUTE, REDIRECT_PATH),
];

/// The service's route table used as a route-conflict oracle.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteTable;

impl RouteOracle for RouteTable {
    fn resolve(&self, path: &str) -> Option<String> {
        ROUTES
            .iter()
            .find(|(_, pattern)| matches_pattern(pattern, path))
            .map(|(name, _)| (*name).to_string())
    }
}

/// Matches `path` against an axum-style pattern, ignoring a trailing slash.
/// A `{param}` segment matches exactly one non-empty segment.
fn matches_pattern(pattern: &str, path: &str) -> bool {
    let pattern: Vec<&str> = pattern.trim_start_matches('/').split('/').collect();
    let path = path.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(path);
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();

    pattern.len() == segments.len()
        && pattern.iter().zip(&segments).all(|(expected, actual)| {
            if expected.starts_with('{') && expected.ends_with('}') {
                !actual.is_empty()
            } else {
                expected == actual
            }
        })
}

/// All routes with state applied, without path normalization.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(ROOT_PATH, get(root_redirect_handler))
        .route(HEALTH_PATH, get(health_handler))
        .route(LINKS_PATH, get(links_list_handler).post(create_link_handler))
        .route(
            LINK_PATH,
            get(get_link_handler)
                .patch(update_link_handler)
                .delete(delete_link_handler),
        )
        .route(CACHE_PATH, delete(cache_clear_handler))
        .route(CACHE_KEYS_PATH, get(cache_keys_handler))
        .route(CACHE_KEY_PATH, delete(cache_invalidate_handler))
        .route(REDIRECT_PATH, get(redirect_handler))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(path: &str) -> Option<String> {
        RouteTable.resolve(path)
    }

    #[test]
    fn test_root() {
        assert_eq!(resolve("/").as_deref(), Some("root"));
    }

    #[test]
    fn test_single_segment_hits_redirect_route() {
        assert_eq!(resolve("/promo/").as_deref(), Some(REDIRECT_ROUTE));
        assert_eq!(resolve("/promo").as_deref(), Some(REDIRECT_ROUTE));
    }

    #[test]
    fn test_system_routes() {
        assert_eq!(resolve("/health/").as_deref(), Some("health"));
        assert_eq!(resolve("/api/links/").as_deref(), Some("links"));
        assert_eq!(resolve("/api/links/42/").as_deref(), Some("link"));
        assert_eq!(resolve("/api/cache/").as_deref(), Some("cache"));
        assert_eq!(resolve("/api/cache/keys/").as_deref(), Some("cache_keys"));
        assert_eq!(resolve("/api/cache/keys/abc/").as_deref(), Some("cache_key"));
    }

    #[test]
    fn test_unknown_multi_segment_path() {
        assert_eq!(resolve("/a/b/"), None);
        assert_eq!(resolve("/api/unknown/"), None);
    }

    #[test]
    fn test_param_requires_non_empty_segment() {
        assert!(!matches_pattern("/api/links/{id}", "/api/links//"));
        assert!(matches_pattern("/api/links/{id}", "/api/links/7"));
    }
}
