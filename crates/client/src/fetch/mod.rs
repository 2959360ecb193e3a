//! HTTP network for the asset router.
//!
//! ### Semantics
//! - Resolves for every HTTP status, like a browser `fetch`: a 404 is a
//!   response, not a failure.
//! - Fails only when no usable response arrives: connection errors, a body
//!   over `max_bytes`, or the optional timeout.
//! - No timeout unless one is configured.
//!
//! ### Limits
//! - Max redirects: 5
//! - Max body bytes: 5MB (configurable)

use async_trait::async_trait;
use reqwest::{Client, Method, header};
use std::time::{Duration, Instant};

use exocortex_core::{AppConfig, AssetRequest, AssetResponse, Error, Network};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "exocortex/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: none)
    pub timeout: Option<Duration>,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { user_agent: "exocortex/0.1".to_string(), max_bytes: 5 * 1024 * 1024, timeout: None, max_redirects: 5 }
    }
}

impl FetchConfig {
    pub fn from_app(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            ..Default::default()
        }
    }
}

/// HTTP client implementing the router's [`Network`].
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Send `request` and buffer the whole response.
    pub async fn send(&self, request: &AssetRequest) -> Result<AssetResponse, Error> {
        let start = Instant::now();
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| Error::InvalidInput(format!("invalid method: {}", request.method)))?;

        let mut builder = self.http.request(method, request.url.clone());
        if let Some(body) = &request.body {
            builder = builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let response = builder.send().await.map_err(|e| transport_error(&request.url, e))?;

        let status = response.status();
        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
            .collect();

        let body = response.bytes().await.map_err(|e| transport_error(&request.url, e))?;

        if body.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", body.len(), self.config.max_bytes)));
        }

        tracing::debug!(
            "fetched {} {} -> {} in {}ms ({} bytes)",
            request.method,
            request.url,
            status.as_u16(),
            start.elapsed().as_millis(),
            body.len()
        );

        Ok(AssetResponse { status: status.as_u16(), headers, body })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl Network for FetchClient {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, Error> {
        self.send(request).await
    }
}

fn transport_error(url: &url::Url, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::FetchTimeout(format!("{url}: {err}"))
    } else {
        Error::Network(format!("{url}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn get(server: &MockServer, path: &str) -> AssetRequest {
        AssetRequest::get(Url::parse(&format!("{}{path}", server.uri())).unwrap())
    }

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "exocortex/0.1");
        assert_eq!(config.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.timeout, None);
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_fetch_config_from_app() {
        let app = AppConfig { user_agent: "test/1".into(), max_bytes: 1024, timeout_ms: Some(500), ..Default::default() };
        let config = FetchConfig::from_app(&app);
        assert_eq!(config.user_agent, "test/1");
        assert_eq!(config.max_bytes, 1024);
        assert_eq!(config.timeout, Some(Duration::from_millis(500)));
    }

    #[tokio::test]
    async fn test_fetch_returns_body_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/style.css"))
            .and(header("user-agent", "exocortex/0.1"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("body {}", "text/css"))
            .expect(1)
            .mount(&server)
            .await;

        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let response = client.fetch(&get(&server, "/style.css")).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.text(), "body {}");
        assert_eq!(response.header("content-type"), Some("text/css"));
    }

    #[tokio::test]
    async fn test_fetch_error_status_still_resolves() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone.js"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let response = client.fetch(&get(&server, "/gone.js")).await.unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(response.text(), "missing");
    }

    #[tokio::test]
    async fn test_fetch_forwards_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(header("content-type", "application/json"))
            .and(body_string(r#"{"message":"hi"}"#))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"response":"ok"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let request = AssetRequest::new("POST", Url::parse(&format!("{}/api/chat", server.uri())).unwrap())
            .with_body(r#"{"message":"hi"}"#);
        let response = client.fetch(&request).await.unwrap();
        assert_eq!(response.status, 200);

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].body, br#"{"message":"hi"}"#);
    }

    #[tokio::test]
    async fn test_fetch_too_large() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/big.bin"))
            .respond_with(ResponseTemplate::new(200).set_body_string("0123456789"))
            .mount(&server)
            .await;

        let config = FetchConfig { max_bytes: 4, ..Default::default() };
        let client = FetchClient::new(config).unwrap();

        let result = client.fetch(&get(&server, "/big.bin")).await;
        assert!(matches!(result, Err(Error::FetchTooLarge(_))));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow.js"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let config = FetchConfig { timeout: Some(Duration::from_millis(100)), ..Default::default() };
        let client = FetchClient::new(config).unwrap();

        let result = client.fetch(&get(&server, "/slow.js")).await;
        assert!(matches!(result, Err(Error::FetchTimeout(_))));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_network_error() {
        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let request = AssetRequest::get(Url::parse("http://127.0.0.1:9/api/chat").unwrap());

        let result = client.fetch(&request).await;
        assert!(matches!(result, Err(Error::Network(_))));
    }

    #[tokio::test]
    async fn test_fetch_rejects_invalid_method() {
        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let request = AssetRequest::new("NOT A METHOD", Url::parse("http://localhost/").unwrap());
        assert!(matches!(client.fetch(&request).await, Err(Error::InvalidInput(_))));
    }
}
