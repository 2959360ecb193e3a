//! The key/value seam the router reads and writes through.
//!
//! [`NamedCache`] is a named store inside a [`CacheDb`]; [`MemoryCache`] keeps
//! the same contract in a map and backs router tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::connection::CacheDb;
use super::key::RequestKey;
use crate::Error;
use crate::router::AssetResponse;

/// Status the Cache API refuses to store.
const PARTIAL_CONTENT: u16 = 206;

/// Whether `response` may be stored under `key`.
///
/// Only GET requests are cached, and partial responses never are.
pub fn is_storable(key: &RequestKey, response: &AssetResponse) -> bool {
    key.is_cacheable() && response.status != PARTIAL_CONTENT
}

/// A response store keyed by request identity.
///
/// `put` overwrites atomically per key; implementations add no expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Stored response for `key`, if any.
    async fn get(&self, key: &RequestKey) -> Result<Option<AssetResponse>, Error>;

    /// Store `response` under `key`. Unstorable pairs are ignored.
    async fn put(&self, key: &RequestKey, response: &AssetResponse) -> Result<(), Error>;

    async fn has(&self, key: &RequestKey) -> Result<bool, Error>;

    /// Store every pair, or none of them.
    async fn put_all(&self, entries: &[(RequestKey, AssetResponse)]) -> Result<(), Error>;
}

/// A named store inside the SQLite cache database.
#[derive(Clone, Debug)]
pub struct NamedCache {
    db: CacheDb,
    name: String,
}

impl NamedCache {
    pub(crate) fn new(db: CacheDb, name: impl Into<String>) -> Self {
        Self { db, name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn db(&self) -> &CacheDb {
        &self.db
    }

    /// Request identities held by this store.
    pub async fn keys(&self) -> Result<Vec<RequestKey>, Error> {
        self.db.cache_keys(&self.name).await
    }
}

#[async_trait]
impl CacheStore for NamedCache {
    async fn get(&self, key: &RequestKey) -> Result<Option<AssetResponse>, Error> {
        if !key.is_cacheable() {
            return Ok(None);
        }
        self.db.get_entry(&self.name, key).await
    }

    async fn put(&self, key: &RequestKey, response: &AssetResponse) -> Result<(), Error> {
        if !is_storable(key, response) {
            tracing::debug!(%key, status = response.status, "skipping unstorable response");
            return Ok(());
        }
        self.db.put_entry(&self.name, key, response).await
    }

    async fn has(&self, key: &RequestKey) -> Result<bool, Error> {
        if !key.is_cacheable() {
            return Ok(false);
        }
        self.db.has_entry(&self.name, key).await
    }

    async fn put_all(&self, entries: &[(RequestKey, AssetResponse)]) -> Result<(), Error> {
        let storable: Vec<_> = entries
            .iter()
            .filter(|(key, response)| is_storable(key, response))
            .cloned()
            .collect();
        self.db.put_entries(&self.name, &storable).await
    }
}

/// In-memory store with the same contract as [`NamedCache`].
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<RequestKey, AssetResponse>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &RequestKey) -> Result<Option<AssetResponse>, Error> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &RequestKey, response: &AssetResponse) -> Result<(), Error> {
        if is_storable(key, response) {
            self.entries.write().await.insert(key.clone(), response.clone());
        }
        Ok(())
    }

    async fn has(&self, key: &RequestKey) -> Result<bool, Error> {
        Ok(self.entries.read().await.contains_key(key))
    }

    async fn put_all(&self, entries: &[(RequestKey, AssetResponse)]) -> Result<(), Error> {
        let mut map = self.entries.write().await;
        for (key, response) in entries.iter().filter(|(key, response)| is_storable(key, response)) {
            map.insert(key.clone(), response.clone());
        }
        Ok(())
    }
}
