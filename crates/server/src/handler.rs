//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::state::ServerState;
use crate::tools::{
    asset::{self, AssetFetchParams},
    cache::{self, CacheGetParams, CachePurgeParams},
    chat::{self, ChatAskParams},
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for exocortex.
#[derive(Clone)]
pub struct ExocortexServer {
    tool_router: ToolRouter<Self>,
    state: Arc<ServerState>,
}

/// Tool router implementation using the #[tool_router] macro.
#[tool_router]
impl ExocortexServer {
    /// Create a new server handler.
    pub fn new(state: Arc<ServerState>) -> Self {
        Self { tool_router: Self::tool_router(), state }
    }

    #[tool(description = "Fetch every asset in the manifest into the cache. Fails without writing anything if any asset cannot be fetched.")]
    async fn asset_install(&self) -> Result<CallToolResult, McpError> {
        asset::install_impl(&self.state.router).await
    }

    /// Requests under the API prefix go network-first; everything else is
    /// served stale-while-revalidate.
    #[tool(description = "Request a URL through the asset cache router. API paths are network-first with cache fallback; other paths are served from cache while refreshing in the background.")]
    async fn asset_fetch(&self, params: Parameters<AssetFetchParams>) -> Result<CallToolResult, McpError> {
        asset::fetch_impl(&self.state.router, params.0).await
    }

    #[tool(description = "Read a cached GET response by URL without touching the network.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        cache::get_impl(&self.state.router, &self.state.cache, params.0).await
    }

    #[tool(description = "Drop whole cache stores: a named one, or every store except the current one.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        cache::purge_impl(&self.state.cache, params.0).await
    }

    #[tool(description = "Send a message to the local chat daemon and return its reply.")]
    async fn chat_ask(&self, params: Parameters<ChatAskParams>) -> Result<CallToolResult, McpError> {
        chat::ask_impl(&self.state.chat, params.0).await
    }

    #[tool(description = "Return the chat daemon's conversation history.")]
    async fn chat_history(&self) -> Result<CallToolResult, McpError> {
        chat::history_impl(&self.state.chat).await
    }

    #[tool(description = "Start a new conversation on the chat daemon.")]
    async fn chat_new_session(&self) -> Result<CallToolResult, McpError> {
        chat::new_session_impl(&self.state.chat).await
    }
}

impl ServerHandler for ExocortexServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "exocortex".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
