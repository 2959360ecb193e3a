//! Shared server state: configuration, router, cache and chat client.

use std::sync::Arc;

use exocortex_client::{ChatClient, ChatConfig, FetchClient, FetchConfig};
use exocortex_core::{AppConfig, CacheDb, Error, NamedCache, Network, Router};

/// Everything the tools need, built once at startup.
pub struct ServerState {
    pub config: AppConfig,
    pub router: Router,
    pub cache: NamedCache,
    pub chat: ChatClient,
}

impl ServerState {
    /// Wire the live HTTP network and the store named in `config` into a router.
    pub fn new(config: AppConfig, db: &CacheDb) -> Result<Self, Error> {
        let network = Arc::new(FetchClient::new(FetchConfig::from_app(&config))?);
        Self::with_network(config, db, network)
    }

    pub fn with_network(config: AppConfig, db: &CacheDb, network: Arc<dyn Network>) -> Result<Self, Error> {
        let cache = db.open_cache(config.cache_name.clone());
        let router = Router::from_config(&config, network, Arc::new(cache.clone()))?;
        let chat = ChatClient::new(ChatConfig::from_app(&config))?;

        Ok(Self { config, router, cache, chat })
    }

    /// Run install, logging instead of failing when the network is not there.
    pub async fn install_on_start(&self) {
        if !self.config.install_on_start {
            return;
        }
        match self.router.install().await {
            Ok(count) => tracing::info!(cache_name = %self.cache.name(), count, "startup install complete"),
            Err(e) => tracing::error!(error = %e, "startup install failed; call asset_install to retry"),
        }
    }
}
