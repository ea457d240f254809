//! Handlers for short URL redirects.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{Extensions, HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::net::SocketAddr;

use crate::application::services::Resolution;
use crate::domain::visit::VisitContext;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_meta::{client_ip, cookie, short_url};

/// Redirects a short code to its destination.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Look the code up in the redirect cache (key `shortener:url:{code}`)
/// 2. On a hit, re-arm the cache TTL
/// 3. On a miss, query the store and populate the cache
/// 4. Hand the visit to the notifier without waiting for it
/// 5. Return 302 Found
///
/// A cache outage only costs latency; the store still answers.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 500 if the cache missed and the store failed.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    extensions: Extensions,
) -> Result<Response, AppError> {
    let context = visit_context(&state, &headers, &extensions, &code);

    match state.resolution_service.resolve(&code, &context).await? {
        Resolution::Redirect { url, .. } => Ok(found(&url)),
        Resolution::NotFound => Err(AppError::not_found(
            "Short link not found",
            json!({ "short_code": code }),
        )),
    }
}

/// Redirects the site root.
///
/// # Endpoint
///
/// `GET /`
///
/// Resolves the root link (alias `/` or `@root`) like any other code.
/// Without one, redirects to the configured default destination.
pub async fn root_redirect_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    extensions: Extensions,
) -> Result<Response, AppError> {
    let context = visit_context(&state, &headers, &extensions, "");

    let url = state
        .resolution_service
        .resolve_root(&context, &state.settings.default_destination)
        .await?;

    Ok(found(&url))
}

fn found(url: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, url.to_string())]).into_response()
}

fn visit_context(
    state: &AppState,
    headers: &HeaderMap,
    extensions: &Extensions,
    path: &str,
) -> VisitContext {
    let peer = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());

    VisitContext {
        short_url: short_url(state.settings.public_base_url.as_deref(), headers, path),
        client_ip: client_ip(headers, peer),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        ga_cookie: cookie(headers, "_ga").map(str::to_string),
    }
}
