//! Chat daemon client error types.

use std::sync::Arc;

/// Errors from the chat daemon client.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Nothing to send.
    #[error("empty message")]
    EmptyMessage,

    /// Daemon answered with a non-success status.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error, usually the daemon not running.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ChatError::Timeout } else { ChatError::Network(Arc::new(err)) }
    }
}

impl From<ChatError> for exocortex_core::Error {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyMessage => exocortex_core::Error::InvalidInput("message cannot be empty".into()),
            ChatError::Timeout => exocortex_core::Error::FetchTimeout("chat daemon did not answer".into()),
            ChatError::Network(e) => exocortex_core::Error::Network(e.to_string()),
            other => exocortex_core::Error::Chat(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(ChatError::EmptyMessage.to_string(), "empty message");
        assert_eq!(ChatError::HttpError { status: 502 }.to_string(), "HTTP error: 502");
    }

    #[test]
    fn test_into_core_error() {
        let err: exocortex_core::Error = ChatError::EmptyMessage.into();
        assert!(matches!(err, exocortex_core::Error::InvalidInput(_)));

        let err: exocortex_core::Error = ChatError::HttpError { status: 500 }.into();
        assert!(matches!(err, exocortex_core::Error::Chat(msg) if msg.contains("500")));
    }
}
