mod common;

use axum::http::StatusCode;
use linkgate::application::services::CreateLink;
use serde_json::{Value, json};
use std::sync::Arc;

async fn create_and_visit(app: &common::TestApp, alias: &str) {
    app.state
        .link_service
        .create_link(CreateLink {
            url: format!("https://example.com/{}", alias),
            alias: Some(alias.to_string()),
        })
        .await
        .unwrap();
    app.server
        .get(&format!("/{}", alias))
        .await
        .assert_status(StatusCode::FOUND);
}

#[tokio::test]
async fn test_cache_keys_lists_visited_codes() {
    let app = common::spawn_app();
    create_and_visit(&app, "beta").await;
    create_and_visit(&app, "alpha").await;

    let response = app.server.get("/api/cache/keys").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["count"], 2);

    let keys = body["keys"].as_array().unwrap();
    assert_eq!(keys[0]["key"], "shortener:url:alpha");
    assert_eq!(keys[0]["short_code"], "alpha");
    assert_eq!(keys[1]["short_code"], "beta");

    let ttl = keys[0]["ttl_seconds"].as_u64().unwrap();
    assert!(ttl > 0 && ttl <= 3600);
}

#[tokio::test]
async fn test_cache_keys_reports_unreachable_backend() {
    let app = common::spawn_app_with_cache(Arc::new(common::UnreachableCache));

    let response = app.server.get("/api/cache/keys").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.json::<Value>()["error"]["code"],
        "service_unavailable"
    );
}

#[tokio::test]
async fn test_cache_clear_removes_every_key() {
    let app = common::spawn_app();
    create_and_visit(&app, "one").await;
    create_and_visit(&app, "two").await;

    let response = app.server.delete("/api/cache").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "removed": 2 }));

    let keys = app.server.get("/api/cache/keys").await.json::<Value>();
    assert_eq!(keys["count"], 0);

    // Redirects keep working from the store.
    app.server.get("/one").await.assert_status(StatusCode::FOUND);
}

#[tokio::test]
async fn test_cache_clear_with_unreachable_backend_removes_nothing() {
    let app = common::spawn_app_with_cache(Arc::new(common::UnreachableCache));

    let response = app.server.delete("/api/cache").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "removed": 0 }));
}

#[tokio::test]
async fn test_cache_invalidate_single_code() {
    let app = common::spawn_app();
    create_and_visit(&app, "keep").await;
    create_and_visit(&app, "drop").await;

    app.server
        .delete("/api/cache/keys/drop")
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert!(app.state.cache.get("drop").await.is_none());
    assert!(app.state.cache.get("keep").await.is_some());
}

#[tokio::test]
async fn test_cache_invalidate_missing_code_is_noop() {
    let app = common::spawn_app();

    app.server
        .delete("/api/cache/keys/never-cached")
        .await
        .assert_status(StatusCode::NO_CONTENT);
}
