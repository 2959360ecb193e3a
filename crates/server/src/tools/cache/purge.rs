//! cache_purge tool implementation.
//!
//! Drops whole named stores. Individual entries never expire; after the
//! cache name is versioned forward the old stores are only dead weight.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use exocortex_core::NamedCache;

use crate::tools::json_result;

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Drop only this store. When omitted, every store except the current one is dropped.
    #[serde(default)]
    pub cache_name: Option<String>,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
    /// Stores that still hold entries.
    pub remaining: Vec<String>,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(cache: &NamedCache, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    let db = cache.db();
    let deleted = match params.cache_name {
        Some(name) => db.delete_cache(&name).await?,
        None => db.purge_stale_caches(cache.name()).await?,
    };
    let remaining = db.cache_names().await?;

    tracing::info!(deleted, ?remaining, "purged cache stores");
    json_result(&CachePurgeOutput { deleted, remaining })
}
