//! Fakes shared by tool tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use serde::de::DeserializeOwned;

use exocortex_core::{AssetRequest, AssetResponse, Error, Network};

/// Canned responses per URL; unknown URLs fail like a dead host.
#[derive(Default)]
pub struct ScriptedNetwork {
    responses: Mutex<HashMap<String, AssetResponse>>,
}

impl ScriptedNetwork {
    pub fn with(self, url: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), AssetResponse::new(status, body.to_string()));
        self
    }
}

#[async_trait]
impl Network for ScriptedNetwork {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, Error> {
        self.responses
            .lock()
            .unwrap()
            .get(request.url.as_str())
            .cloned()
            .ok_or_else(|| Error::Network(format!("connection refused: {}", request.url)))
    }
}

/// Decode the JSON text content of a tool result.
pub fn decode<T: DeserializeOwned>(result: &CallToolResult) -> T {
    let content_val = serde_json::to_value(&result.content[0]).unwrap();
    let text = content_val
        .get("text")
        .and_then(|v| v.as_str())
        .expect("Expected text field in content");
    serde_json::from_str(text).unwrap()
}
