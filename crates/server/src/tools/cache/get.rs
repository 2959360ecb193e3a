//! cache_get tool implementation.
//!
//! Reads a stored response without touching the network.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use exocortex_core::{CacheStore, Error, NamedCache, Router};

use crate::tools::{ResponseOutput, json_result};

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// URL of the cached GET request. Root-relative paths resolve against the configured origin.
    pub url: String,
}

/// Implementation of the cache_get tool.
pub async fn get_impl(router: &Router, cache: &NamedCache, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let request = router.request("GET", &params.url)?;
    let response = cache
        .get(&request.key())
        .await?
        .ok_or_else(|| Error::CacheMiss(request.url.to_string()))?;

    json_result(&ResponseOutput::new(request.url.as_str(), &response))
}
