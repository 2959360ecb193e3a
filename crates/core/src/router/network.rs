//! The network seam the router fetches through.

use async_trait::async_trait;

use super::request::{AssetRequest, AssetResponse};
use crate::Error;

/// A live network.
///
/// `fetch` resolves for any HTTP status and fails only when no response
/// arrived at all, so a 404 or 500 counts as a successful fetch.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, Error>;
}
