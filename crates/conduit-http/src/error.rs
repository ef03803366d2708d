//! HTTP client error types

use thiserror::Error;

use crate::transport::TransportFailure;

/// Result type for HTTP operations
pub type Result<T> = std::result::Result<T, HttpError>;

/// HTTP client errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Method token that is not a valid HTTP method
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// Header name or value that the transport cannot represent
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Invalid proxy configuration
    #[error("Invalid proxy configuration: {0}")]
    InvalidProxy(String),

    /// Filter query string that the codec cannot decode
    #[error("Invalid filter query: {0}")]
    InvalidFilterQuery(String),

    /// A middleware stage or the config composer failed
    #[error("Middleware failed: {0}")]
    Middleware(String),

    /// Transport reported an HTTP or network failure
    #[error("HTTP {}: {}", .0.status, .0.status_text.as_deref().unwrap_or(""))]
    Transport(TransportFailure),

    /// Body could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Client build error
    #[error("Failed to build HTTP client: {0}")]
    BuildError(String),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HttpError {
    /// Shorthand for middleware authors
    pub fn middleware(message: impl Into<String>) -> Self {
        HttpError::Middleware(message.into())
    }

    /// Status code of a transport failure, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Transport(failure) => Some(failure.status),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for HttpError {
    fn from(err: toml::de::Error) -> Self {
        HttpError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderMap;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_transport_error_display() {
        let err = HttpError::Transport(TransportFailure {
            status: 404,
            status_text: Some("Not Found".to_string()),
            headers: HeaderMap::new(),
            error: json!({"message": "Not Found"}),
        });

        assert_eq!(err.to_string(), "HTTP 404: Not Found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_middleware_error() {
        let err = HttpError::middleware("token expired");
        assert_eq!(err.to_string(), "Middleware failed: token expired");
        assert_eq!(err.status(), None);
    }
}
