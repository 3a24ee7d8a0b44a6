use std::sync::Arc;

use sitebuilder_backend::Backend;
use sitebuilder_events::EventBus;
use sitebuilder_gateway::{ComponentGateway, PageCache, PageGateway};

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Page component cache shared by every request.
    pub cache: Arc<PageCache>,
    /// Component writes.
    pub components: Arc<ComponentGateway>,
    /// Page writes, publish and reset.
    pub pages: Arc<PageGateway>,
    /// WebSocket connection manager (builder and site clients).
    pub ws_manager: Arc<WsManager>,
    /// Event bus carrying invalidations and mutation events.
    pub event_bus: Arc<EventBus>,
}

impl AppState {
    /// Wire the gateways around `backend`.
    pub fn new(
        config: ServerConfig,
        backend: Arc<dyn Backend>,
        event_bus: Arc<EventBus>,
        ws_manager: Arc<WsManager>,
    ) -> Self {
        let cache = Arc::new(PageCache::new(backend, Arc::clone(&event_bus)));
        Self {
            config: Arc::new(config),
            components: Arc::new(ComponentGateway::new(Arc::clone(&cache))),
            pages: Arc::new(PageGateway::new(Arc::clone(&cache))),
            cache,
            ws_manager,
            event_bus,
        }
    }
}
