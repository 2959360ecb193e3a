//! The two caching strategies.

use std::sync::Arc;

use tokio::sync::oneshot;

use super::network::Network;
use super::refresh::Refreshes;
use super::request::{AssetRequest, AssetResponse};
use crate::Error;
use crate::cache::CacheStore;

/// Network first, falling back to the cache only when the fetch fails.
///
/// A resolved fetch is returned verbatim and never written to the cache.
/// With no cached entry the fetch error is returned unchanged.
pub async fn network_first(
    request: &AssetRequest, network: &dyn Network, store: &dyn CacheStore,
) -> Result<AssetResponse, Error> {
    let error = match network.fetch(request).await {
        Ok(response) => return Ok(response),
        Err(e) => e,
    };

    let key = request.key();
    match store.get(&key).await {
        Ok(Some(cached)) => {
            tracing::debug!(%key, error = %error, "network failed, serving cached response");
            Ok(cached)
        }
        Ok(None) => Err(error),
        Err(lookup) => {
            tracing::warn!(%key, error = %lookup, "cache lookup failed during network fallback");
            Err(error)
        }
    }
}

/// Serve the cached response at once and refresh it in the background.
///
/// The lookup happens first, then the refresh fetch is spawned as a tracked
/// task in `refreshes`. On a hit the caller never waits on it; on a miss the
/// caller waits for its result. A successful fetch is always written back
/// under the same key; a failed one leaves the cache untouched.
pub async fn stale_while_revalidate(
    request: &AssetRequest, network: Arc<dyn Network>, store: Arc<dyn CacheStore>, refreshes: &Refreshes,
) -> Result<AssetResponse, Error> {
    let key = request.key();
    let cached = match store.get(&key).await {
        Ok(cached) => cached,
        Err(e) => {
            tracing::warn!(%key, error = %e, "cache lookup failed, treating as miss");
            None
        }
    };

    let (tx, rx) = oneshot::channel();
    let refresh = request.clone();
    refreshes
        .spawn(async move {
            let result = network.fetch(&refresh).await;
            let fresh = result.as_ref().ok().cloned();
            // The caller may have been served from cache already.
            let _ = tx.send(result);

            let key = refresh.key();
            match fresh {
                Some(response) => {
                    if let Err(e) = store.put(&key, &response).await {
                        tracing::warn!(%key, error = %e, "failed to store refreshed response");
                    }
                }
                None => tracing::debug!(%key, "background refresh failed, cache left as is"),
            }
        })
        .await;

    if let Some(cached) = cached {
        tracing::debug!(%key, "cache hit");
        return Ok(cached);
    }

    tracing::debug!(%key, "cache miss, waiting for network");
    rx.await
        .map_err(|_| Error::Network(format!("refresh for {key} ended without a response")))?
}
