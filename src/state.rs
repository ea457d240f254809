//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AliasValidator, LinkService, ResolutionService};
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::analytics::VisitNotifier;
use crate::infrastructure::cache::RedirectCache;
use crate::routes::RouteTable;

/// Settings of the public redirect surface.
#[derive(Debug, Clone)]
pub struct RedirectSettings {
    /// Where `/` goes when no root link is stored.
    pub default_destination: String,
    /// Base of reported short URLs. `None` derives it from the request.
    pub public_base_url: Option<String>,
}

impl Default for RedirectSettings {
    fn default() -> Self {
        Self {
            default_destination: "/links".to_string(),
            public_base_url: None,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub resolution_service: Arc<ResolutionService>,
    pub link_repository: Arc<dyn LinkRepository>,
    pub cache: RedirectCache,
    pub settings: Arc<RedirectSettings>,
}

impl AppState {
    /// Wires the services over one store, one cache and one notifier.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        cache: RedirectCache,
        notifier: Arc<dyn VisitNotifier>,
        settings: RedirectSettings,
    ) -> Self {
        let validator = AliasValidator::new(link_repository.clone(), Arc::new(RouteTable));

        let link_service = Arc::new(LinkService::new(
            link_repository.clone(),
            cache.clone(),
            validator,
        ));
        let resolution_service = Arc::new(ResolutionService::new(
            link_repository.clone(),
            cache.clone(),
            notifier,
        ));

        Self {
            link_service,
            resolution_service,
            link_repository,
            cache,
            settings: Arc::new(settings),
        }
    }
}
