//! asset_install and asset_fetch tool implementations.
//!
//! Run the router's install step, or push one request through it.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use exocortex_core::{Error, RequestClass, Router};

use super::{ResponseOutput, json_result};

/// Output from the asset_install tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssetInstallOutput {
    /// Number of manifest assets now cached.
    pub installed: usize,
    /// The cached URLs, in manifest order.
    pub assets: Vec<String>,
}

/// Implementation of the asset_install tool.
pub async fn install_impl(router: &Router) -> Result<CallToolResult, McpError> {
    let installed = router.install().await?;
    let assets = router.manifest().assets().iter().map(|u| u.to_string()).collect();
    json_result(&AssetInstallOutput { installed, assets })
}

/// Parameters for the asset_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssetFetchParams {
    /// URL to request. Root-relative paths resolve against the configured origin.
    pub url: String,

    /// HTTP method (default: GET). Only GET responses are ever cached.
    #[serde(default = "default_method")]
    pub method: String,

    /// Optional request body, sent as JSON.
    #[serde(default)]
    pub body: Option<String>,
}

fn default_method() -> String {
    "GET".into()
}

/// Output from the asset_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssetFetchOutput {
    /// Strategy used: "network_first" or "stale_while_revalidate".
    pub strategy: String,
    /// The response served.
    pub response: ResponseOutput,
}

/// Implementation of the asset_fetch tool.
pub async fn fetch_impl(router: &Router, params: AssetFetchParams) -> Result<CallToolResult, McpError> {
    if params.url.trim().is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()).into());
    }

    let mut request = router.request(&params.method, &params.url)?;
    if let Some(body) = params.body {
        request = request.with_body(body);
    }

    let strategy = match router.classify(&request) {
        RequestClass::Api => "network_first",
        RequestClass::Static => "stale_while_revalidate",
    };

    let response = router.intercept(&request).await?;
    let output = AssetFetchOutput {
        strategy: strategy.into(),
        response: ResponseOutput::new(request.url.as_str(), &response),
    };
    json_result(&output)
}
