#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use linkgate::domain::visit::Visit;
use linkgate::infrastructure::analytics::{NullNotifier, VisitNotifier};
use linkgate::infrastructure::cache::{
    CacheBackend, CacheError, CacheResult, MemoryCache, RedirectCache,
};
use linkgate::infrastructure::persistence::MemoryLinkRepository;
use linkgate::routes::router;
use linkgate::state::{AppState, RedirectSettings};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::Layer;

pub const BASE_URL: &str = "https://s.test";
pub const TTL: Duration = Duration::from_secs(3600);

/// Test application over the in-memory store and cache.
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub repo: Arc<MemoryLinkRepository>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn settings() -> RedirectSettings {
    RedirectSettings {
        default_destination: "/links".to_string(),
        public_base_url: Some(BASE_URL.to_string()),
    }
}

pub fn create_test_state(backend: Arc<dyn CacheBackend>) -> (AppState, Arc<MemoryLinkRepository>) {
    let repo = Arc::new(MemoryLinkRepository::new());
    let cache = RedirectCache::new(backend, TTL, Duration::from_millis(250));
    let state = AppState::new(repo.clone(), cache, Arc::new(NullNotifier), settings());
    (state, repo)
}

pub fn spawn_app() -> TestApp {
    spawn_app_with_cache(Arc::new(MemoryCache::new()))
}

pub fn spawn_app_with_cache(backend: Arc<dyn CacheBackend>) -> TestApp {
    let repo = Arc::new(MemoryLinkRepository::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let cache = RedirectCache::new(backend, TTL, Duration::from_millis(250));
    let state = AppState::new(repo.clone(), cache, notifier.clone(), settings());

    let app: Router = router(state.clone()).layer(MockConnectInfoLayer);
    let server = TestServer::new(app).unwrap();

    TestApp {
        server,
        state,
        repo,
        notifier,
    }
}

/// Records every visit instead of sending it anywhere.
#[derive(Default)]
pub struct RecordingNotifier {
    visits: Mutex<Vec<Visit>>,
}

impl RecordingNotifier {
    pub fn visits(&self) -> Vec<Visit> {
        self.visits.lock().unwrap().clone()
    }
}

impl VisitNotifier for RecordingNotifier {
    fn notify(&self, visit: Visit) {
        self.visits.lock().unwrap().push(visit);
    }
}

/// A cache backend whose every call fails, like an unreachable Redis.
pub struct UnreachableCache;

#[async_trait]
impl CacheBackend for UnreachableCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(refused())
    }

    async fn set_ex(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
        Err(refused())
    }

    async fn expire(&self, _key: &str, _ttl: Duration) -> CacheResult<bool> {
        Err(refused())
    }

    async fn delete(&self, _key: &str) -> CacheResult<bool> {
        Err(refused())
    }

    async fn delete_matching(&self, _pattern: &str) -> CacheResult<usize> {
        Err(refused())
    }

    async fn scan_keys(&self, _pattern: &str) -> CacheResult<Vec<String>> {
        Err(refused())
    }

    async fn ttl(&self, _key: &str) -> CacheResult<Option<Duration>> {
        Err(refused())
    }

    async fn ping(&self) -> CacheResult<()> {
        Err(refused())
    }
}

fn refused() -> CacheError {
    CacheError::ConnectionError("connection refused".to_string())
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
