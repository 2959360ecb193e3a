//! Chat daemon client.
//!
//! The editor glue's half of the system: forwards text to the locally
//! running daemon and reads its replies.
//!
//! ### Endpoints
//!
//! - `POST /api/chat` with `{"message": ...}` -> `{"response": ...}` or `{"message": ...}`
//! - `GET /api/history` -> `{"history": [{"role": ..., "content": ...}]}`
//! - `POST /api/session/new`, no body, resets the conversation

pub mod error;

pub use error::ChatError;

use reqwest::header;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

use exocortex_core::AppConfig;

/// Default daemon address.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "exocortex/0.1";

/// Chat client configuration.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Daemon base URL (default: http://localhost:8000).
    pub base_url: String,
    /// Request timeout (default: none, replies can take a while).
    pub timeout: Option<Duration>,
    /// User-agent string.
    pub user_agent: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), timeout: None, user_agent: DEFAULT_USER_AGENT.to_string() }
    }
}

impl ChatConfig {
    pub fn from_app(config: &AppConfig) -> Self {
        Self { base_url: config.chat_base_url(), timeout: config.timeout(), user_agent: config.user_agent.clone() }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// One turn of the daemon's conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    history: Vec<ChatTurn>,
}

/// Chat daemon client.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    config: ChatConfig,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Result<Self, ChatError> {
        let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| ChatError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Send `message` and return the daemon's reply text.
    pub async fn ask(&self, message: &str) -> Result<String, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let start = Instant::now();
        let response = self
            .http
            .post(self.endpoint("/api/chat"))
            .header(header::ACCEPT, "application/json")
            .json(&ChatRequest { message })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::HttpError { status: status.as_u16() });
        }

        let bytes = response.bytes().await?;
        let value: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| ChatError::Parse(e.to_string()))?;

        tracing::debug!("chat reply in {:?} ({} bytes)", start.elapsed(), bytes.len());

        Ok(reply_text(&value))
    }

    /// Fetch the daemon's conversation history.
    pub async fn history(&self) -> Result<Vec<ChatTurn>, ChatError> {
        let response = self
            .http
            .get(self.endpoint("/api/history"))
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::HttpError { status: status.as_u16() });
        }

        let bytes = response.bytes().await?;
        let parsed: HistoryResponse = serde_json::from_slice(&bytes).map_err(|e| ChatError::Parse(e.to_string()))?;
        Ok(parsed.history)
    }

    /// Start a fresh conversation on the daemon.
    pub async fn new_session(&self) -> Result<(), ChatError> {
        let response = self.http.post(self.endpoint("/api/session/new")).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::HttpError { status: status.as_u16() });
        }

        tracing::debug!("started new chat session");
        Ok(())
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }
}

/// Reply text from a chat response body.
///
/// Takes `response`, then `message`, skipping empty strings; anything else
/// falls back to the raw JSON.
pub fn reply_text(value: &serde_json::Value) -> String {
    ["response", "message"]
        .iter()
        .find_map(|field| value.get(field).and_then(|v| v.as_str()).filter(|s| !s.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: String) -> ChatClient {
        ChatClient::new(ChatConfig { base_url, ..Default::default() }).unwrap()
    }

    #[test]
    fn test_reply_text_prefers_response() {
        assert_eq!(reply_text(&json!({"response": "hi", "message": "ignored"})), "hi");
        assert_eq!(reply_text(&json!({"message": "fallback"})), "fallback");
        assert_eq!(reply_text(&json!({"response": "", "message": "fallback"})), "fallback");
        assert_eq!(reply_text(&json!({"other": 1})), r#"{"other":1}"#);
    }

    #[test]
    fn test_config_from_app() {
        let app = AppConfig { chat_host: "127.0.0.1".into(), chat_port: 9001, ..Default::default() };
        let config = ChatConfig::from_app(&app);
        assert_eq!(config.base_url, "http://127.0.0.1:9001");
        assert_eq!(config.timeout, None);
    }

    #[tokio::test]
    async fn test_ask_posts_trimmed_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(json!({"message": "what is the answer?"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "42"})))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client(server.uri()).ask("  what is the answer?  ").await.unwrap();
        assert_eq!(reply, "42");
    }

    #[tokio::test]
    async fn test_ask_rejects_empty_message() {
        let server = MockServer::start().await;
        assert!(matches!(client(server.uri()).ask("   ").await, Err(ChatError::EmptyMessage)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ask_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        assert!(matches!(client(server.uri()).ask("hi").await, Err(ChatError::HttpError { status: 500 })));
    }

    #[tokio::test]
    async fn test_ask_non_json_reply_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        assert!(matches!(client(server.uri()).ask("hi").await, Err(ChatError::Parse(_))));
    }

    #[tokio::test]
    async fn test_ask_daemon_down() {
        let result = client("http://127.0.0.1:9".to_string()).ask("hi").await;
        assert!(matches!(result, Err(ChatError::Network(_))));
    }

    #[tokio::test]
    async fn test_history() {
        let server = MockServer::start().await;
        let body = json!({"history": [
            {"role": "user", "content": "hi"},
            {"role": "assistant", "content": "hello"}
        ]});
        Mock::given(method("GET"))
            .and(path("/api/history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let history = client(server.uri()).history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1], ChatTurn { role: "assistant".into(), content: "hello".into() });
    }

    #[tokio::test]
    async fn test_new_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/session/new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        client(server.uri()).new_session().await.unwrap();
    }
}
