//! reqwest-backed transport

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Response;
use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    config::HttpConfig,
    error::{HttpError, Result},
    request::ResponseType,
    transport::{
        Transport, TransportFailure, TransportOutcome, TransportRequest, TransportResponse,
    },
};

/// Production transport
pub struct ReqwestTransport {
    inner: reqwest::Client,
    config: HttpConfig,
}

impl ReqwestTransport {
    /// Create a new transport with configuration
    pub fn new(config: HttpConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .user_agent(&config.user_agent)
            .redirect(if config.max_redirects > 0 {
                reqwest::redirect::Policy::limited(config.max_redirects)
            } else {
                reqwest::redirect::Policy::none()
            });

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        // Configure proxy if provided
        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| HttpError::InvalidProxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        let inner = builder
            .build()
            .map_err(|e| HttpError::BuildError(e.to_string()))?;

        Ok(Self { inner, config })
    }

    /// Create transport with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(HttpConfig::default())
    }

    /// Get underlying reqwest client (for advanced usage)
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }

    /// Get configuration
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn dispatch(&self, request: TransportRequest) -> TransportOutcome {
        let url = request
            .url
            .parse::<url::Url>()
            .map_err(|e| TransportFailure::network(format!("Invalid URL {}: {e}", request.url)))?;

        if request.with_credentials {
            trace!("withCredentials has no effect on the reqwest transport");
        }

        let mut builder = self
            .inner
            .request(request.method.clone(), url)
            .headers(request.headers);

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            debug!("HTTP {} {} failed before a response: {}", request.method, request.url, e);
            TransportFailure::network(e.to_string())
        })?;

        read_response(response, request.response_type).await
    }
}

async fn read_response(response: Response, response_type: ResponseType) -> TransportOutcome {
    let status = response.status();
    let status_text = status.canonical_reason().map(str::to_string);
    let headers = response.headers().clone();

    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            return Err(TransportFailure {
                status: status.as_u16(),
                status_text,
                headers,
                error: Value::String(e.to_string()),
            })
        }
    };

    let decoded = decode_body(&bytes, response_type);

    if status.is_success() {
        match decoded {
            Ok(body) => Ok(TransportResponse {
                status: status.as_u16(),
                status_text,
                headers,
                body,
            }),
            Err(raw) => Err(TransportFailure {
                status: status.as_u16(),
                status_text,
                headers,
                error: Value::String(raw),
            }),
        }
    } else {
        Err(TransportFailure {
            status: status.as_u16(),
            status_text,
            headers,
            error: decoded.unwrap_or_else(Value::String),
        })
    }
}

/// Decode a body; on failure return the raw text instead
fn decode_body(bytes: &[u8], response_type: ResponseType) -> std::result::Result<Value, String> {
    match response_type {
        ResponseType::Text => Ok(Value::String(String::from_utf8_lossy(bytes).into_owned())),
        ResponseType::Json => {
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(Value::Null);
            }
            serde_json::from_slice(bytes).map_err(|_| String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// Create a shared transport (Arc-wrapped for cloning)
pub fn shared_transport(config: HttpConfig) -> Result<Arc<dyn Transport>> {
    Ok(Arc::new(ReqwestTransport::new(config)?))
}
