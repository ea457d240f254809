//! HTTP server initialization and runtime setup.
//!
//! Builds the link store, redirect cache and visit notifier from
//! [`Config`], then runs the Axum server until shutdown.

use crate::config::{CacheBackendKind, Config};
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::analytics::{Ga4Config, Ga4Notifier, NullNotifier, VisitNotifier};
use crate::infrastructure::cache::{
    CacheBackend, MemoryCache, NullCache, RedirectCache, RedisCache,
};
use crate::infrastructure::persistence::{MemoryLinkRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::{AppState, RedirectSettings};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// How often the in-memory cache drops expired entries.
const MEMORY_PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config).await?;

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Builds the shared state the server and the admin CLI operate on.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let link_repository = connect_store(config).await?;
    let backend = connect_cache(config).await;
    let cache = RedirectCache::new(backend, config.cache_ttl(), config.cache_timeout());
    let notifier = build_notifier(config);

    let settings = RedirectSettings {
        default_destination: config.default_destination.clone(),
        public_base_url: config.public_base_url.clone(),
    };

    Ok(AppState::new(link_repository, cache, notifier, settings))
}

/// Connects to PostgreSQL and applies migrations, or falls back to the
/// in-memory store when no database is configured.
pub async fn connect_store(config: &Config) -> Result<Arc<dyn LinkRepository>> {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("No database configured, links are kept in memory and lost on restart");
        return Ok(Arc::new(MemoryLinkRepository::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(Arc::new(PgLinkRepository::new(Arc::new(pool))))
}

/// Selects the cache backend. A Redis connection failure degrades to
/// [`NullCache`] instead of failing startup.
pub async fn connect_cache(config: &Config) -> Arc<dyn CacheBackend> {
    match (config.cache_backend, &config.redis_url) {
        (CacheBackendKind::Redis, Some(redis_url)) => match RedisCache::connect(redis_url).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        },
        (CacheBackendKind::Memory, _) => {
            tracing::info!("Cache enabled (in-memory)");
            let cache = Arc::new(MemoryCache::new());
            tokio::spawn(purge_expired_entries(cache.clone()));
            cache
        }
        _ => {
            tracing::info!("Cache disabled (NullCache)");
            Arc::new(NullCache::new())
        }
    }
}

/// Uses GA4 when both credentials are configured.
pub fn build_notifier(config: &Config) -> Arc<dyn VisitNotifier> {
    let Some((measurement_id, api_secret)) = config.ga4_credentials() else {
        tracing::info!("Visit notifications disabled");
        return Arc::new(NullNotifier);
    };

    let ga4 = Ga4Config {
        measurement_id: measurement_id.to_string(),
        api_secret: api_secret.to_string(),
        timeout: Duration::from_secs(config.ga_timeout_seconds),
        endpoint: None,
    };

    match Ga4Notifier::new(ga4) {
        Ok(notifier) => {
            tracing::info!("Visit notifications enabled (GA4)");
            Arc::new(notifier)
        }
        Err(e) => {
            tracing::warn!("Failed to build GA4 client: {}. Notifications disabled.", e);
            Arc::new(NullNotifier)
        }
    }
}

async fn purge_expired_entries(cache: Arc<MemoryCache>) {
    let mut interval = tokio::time::interval(MEMORY_PURGE_INTERVAL);
    loop {
        interval.tick().await;
        let purged = cache.purge_expired();
        if purged > 0 {
            tracing::debug!(purged, "Purged expired cache entries");
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
