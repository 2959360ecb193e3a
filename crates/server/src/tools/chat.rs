//! chat_ask, chat_history and chat_new_session tool implementations.
//!
//! Thin pass-through to the chat daemon.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use exocortex_client::{ChatClient, ChatTurn};
use exocortex_core::Error;

use super::json_result;

/// Parameters for the chat_ask tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChatAskParams {
    /// Text to send, typically an editor selection.
    pub message: String,
}

/// Output from the chat_ask tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChatAskOutput {
    pub reply: String,
}

/// One conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TurnOutput {
    pub role: String,
    pub content: String,
}

/// Output from the chat_history tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChatHistoryOutput {
    pub history: Vec<TurnOutput>,
}

/// Output from the chat_new_session tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChatNewSessionOutput {
    pub started: bool,
}

/// Implementation of the chat_ask tool.
pub async fn ask_impl(chat: &ChatClient, params: ChatAskParams) -> Result<CallToolResult, McpError> {
    let reply = chat.ask(&params.message).await.map_err(Error::from)?;
    json_result(&ChatAskOutput { reply })
}

/// Implementation of the chat_history tool.
pub async fn history_impl(chat: &ChatClient) -> Result<CallToolResult, McpError> {
    let history = chat
        .history()
        .await
        .map_err(Error::from)?
        .into_iter()
        .map(|ChatTurn { role, content }| TurnOutput { role, content })
        .collect();
    json_result(&ChatHistoryOutput { history })
}

/// Implementation of the chat_new_session tool.
pub async fn new_session_impl(chat: &ChatClient) -> Result<CallToolResult, McpError> {
    chat.new_session().await.map_err(Error::from)?;
    json_result(&ChatNewSessionOutput { started: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::decode;
    use exocortex_client::ChatConfig;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: String) -> ChatClient {
        ChatClient::new(ChatConfig { base_url, ..Default::default() }).unwrap()
    }

    fn unreachable_client() -> ChatClient {
        // Port 9 (discard) is not expected to run an HTTP daemon.
        client("http://127.0.0.1:9".into())
    }

    #[tokio::test]
    async fn test_ask_impl_returns_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(json!({"message": "summarize this"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "a summary"})))
            .expect(1)
            .mount(&server)
            .await;

        let params = ChatAskParams { message: "summarize this".into() };
        let result = ask_impl(&client(server.uri()), params).await.unwrap();

        let output: ChatAskOutput = decode(&result);
        assert_eq!(output.reply, "a summary");
    }

    #[tokio::test]
    async fn test_history_impl_returns_turns() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"history": [
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hello"}
            ]})))
            .mount(&server)
            .await;

        let result = history_impl(&client(server.uri())).await.unwrap();

        let output: ChatHistoryOutput = decode(&result);
        assert_eq!(output.history.len(), 2);
        assert_eq!(output.history[0].role, "user");
        assert_eq!(output.history[1].content, "hello");
    }

    #[tokio::test]
    async fn test_new_session_impl() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/session/new"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let result = new_session_impl(&client(server.uri())).await.unwrap();

        let output: ChatNewSessionOutput = decode(&result);
        assert!(output.started);
    }

    #[tokio::test]
    async fn test_ask_impl_empty_message() {
        let params = ChatAskParams { message: "   ".into() };
        let err = ask_impl(&unreachable_client(), params).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[tokio::test]
    async fn test_ask_impl_daemon_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let params = ChatAskParams { message: "hi".into() };
        let err = ask_impl(&client(server.uri()), params).await.unwrap_err();
        assert_eq!(err.code.0, -32010);
    }

    #[tokio::test]
    async fn test_history_impl_daemon_down() {
        assert!(history_impl(&unreachable_client()).await.is_err());
    }
}
