//! Requests the router intercepts and the responses it hands back.

use bytes::Bytes;
use url::Url;

use crate::cache::RequestKey;

/// An outgoing request seen by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub method: String,
    pub url: Url,
    pub body: Option<Bytes>,
}

impl AssetRequest {
    pub fn new(method: impl Into<String>, url: Url) -> Self {
        Self { method: method.into().to_ascii_uppercase(), url, body: None }
    }

    pub fn get(url: Url) -> Self {
        Self::new("GET", url)
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Cache identity of this request.
    pub fn key(&self) -> RequestKey {
        RequestKey::new(&self.method, self.url.as_str())
    }
}

/// A response as served to the caller or held in a cache store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl AssetResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self { status, headers: Vec::new(), body: body.into() }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_key_follows_method_and_url() {
        let url = Url::parse("https://example.com/style.css").unwrap();
        let request = AssetRequest::new("get", url);
        assert_eq!(request.method, "GET");
        assert_eq!(request.key(), RequestKey::get("https://example.com/style.css"));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = AssetResponse::new(200, "body").with_header("Content-Type", "text/css");
        assert_eq!(response.header("content-type"), Some("text/css"));
        assert_eq!(response.header("etag"), None);
    }

    #[test]
    fn test_is_success() {
        assert!(AssetResponse::new(204, "").is_success());
        assert!(!AssetResponse::new(304, "").is_success());
        assert!(!AssetResponse::new(404, "").is_success());
    }
}
