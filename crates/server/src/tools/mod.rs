//! MCP tool implementations.
//!
//! This module contains all tools exposed by the exocortex server.

pub mod asset;
pub mod cache;
pub mod chat;

#[cfg(test)]
pub(crate) mod test_support;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use exocortex_core::{AssetResponse, Error};

/// A response header.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HeaderPair {
    pub name: String,
    pub value: String,
}

/// A response as reported by the tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResponseOutput {
    /// Absolute URL the response belongs to.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response headers in received order.
    pub headers: Vec<HeaderPair>,
    /// Body as text (invalid UTF-8 replaced).
    pub body: String,
    /// Body length in bytes.
    pub bytes: usize,
}

impl ResponseOutput {
    pub fn new(url: &str, response: &AssetResponse) -> Self {
        Self {
            url: url.to_string(),
            status: response.status,
            headers: response
                .headers
                .iter()
                .map(|(name, value)| HeaderPair { name: name.clone(), value: value.clone() })
                .collect(),
            body: response.text(),
            bytes: response.body.len(),
        }
    }
}

/// Serialize `output` as the tool's single text content.
pub fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
