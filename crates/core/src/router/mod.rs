//! Asset cache router.
//!
//! Intercepts outgoing requests and serves them from cache or network:
//!
//! - **API** requests (path under the API prefix): network first, cached
//!   copy only when the network fails.
//! - **Static** requests: stale-while-revalidate. A cached copy is served
//!   at once while a tracked background task refreshes it.
//!
//! Install fetches the whole asset manifest and stores it in one write.
//!
//! There is no retry, backoff, deduplication or timeout here. Unless the
//! network implementation enforces a timeout, a hung fetch leaves its request
//! (or its background refresh) pending.

pub mod classify;
pub mod manifest;
pub mod network;
pub mod refresh;
pub mod request;
pub mod strategy;
pub mod url;

use std::sync::Arc;

pub use classify::{RequestClass, classify};
pub use manifest::AssetManifest;
pub use network::Network;
pub use refresh::Refreshes;
pub use request::{AssetRequest, AssetResponse};

use crate::Error;
use crate::cache::CacheStore;
use crate::config::AppConfig;

/// Routes requests between a [`Network`] and a [`CacheStore`].
pub struct Router {
    network: Arc<dyn Network>,
    store: Arc<dyn CacheStore>,
    origin: ::url::Url,
    api_prefix: String,
    manifest: AssetManifest,
    refreshes: Refreshes,
}

impl Router {
    pub fn new(
        network: Arc<dyn Network>, store: Arc<dyn CacheStore>, origin: ::url::Url, api_prefix: impl Into<String>,
        manifest: AssetManifest,
    ) -> Self {
        Self { network, store, origin, api_prefix: api_prefix.into(), manifest, refreshes: Refreshes::new() }
    }

    /// Build a router from the origin, API prefix and manifest in `config`.
    pub fn from_config(
        config: &AppConfig, network: Arc<dyn Network>, store: Arc<dyn CacheStore>,
    ) -> Result<Self, Error> {
        let origin = url::parse_origin(&config.origin)?;
        let manifest = AssetManifest::resolve(&config.origin, &config.manifest)?;
        Ok(Self::new(network, store, origin, config.api_prefix.clone(), manifest))
    }

    pub fn manifest(&self) -> &AssetManifest {
        &self.manifest
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Build a request for `input`, resolving relative URLs against the origin.
    pub fn request(&self, method: &str, input: &str) -> Result<AssetRequest, Error> {
        Ok(AssetRequest::new(method, url::resolve(&self.origin, input)?))
    }

    pub fn classify(&self, request: &AssetRequest) -> RequestClass {
        classify(&request.url, &self.api_prefix)
    }

    /// Fetch every manifest asset, then store them all.
    ///
    /// Any transport failure, non-2xx status or 206 fails the install before
    /// anything is written. Returns the number of stored assets.
    pub async fn install(&self) -> Result<usize, Error> {
        tracing::info!(assets = self.manifest.len(), "installing asset manifest");

        let mut entries = Vec::with_capacity(self.manifest.len());
        for request in self.manifest.requests() {
            let url = request.url.to_string();
            let response = self
                .network
                .fetch(&request)
                .await
                .map_err(|e| Error::InstallFailed { url: url.clone(), reason: e.to_string() })?;

            if !response.is_success() || response.status == 206 {
                return Err(Error::InstallFailed { url, reason: format!("status {}", response.status) });
            }

            tracing::debug!(%url, bytes = response.body.len(), "fetched manifest asset");
            entries.push((request.key(), response));
        }

        self.store.put_all(&entries).await?;
        tracing::info!(assets = entries.len(), "asset manifest installed");

        Ok(entries.len())
    }

    /// Serve `request` with the strategy its class calls for.
    pub async fn intercept(&self, request: &AssetRequest) -> Result<AssetResponse, Error> {
        match self.classify(request) {
            RequestClass::Api => strategy::network_first(request, self.network.as_ref(), self.store.as_ref()).await,
            RequestClass::Static => {
                strategy::stale_while_revalidate(request, self.network.clone(), self.store.clone(), &self.refreshes)
                    .await
            }
        }
    }

    /// Wait for every background refresh started so far.
    pub async fn settle(&self) {
        self.refreshes.settle().await;
    }
}
