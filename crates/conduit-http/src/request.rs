//! Per-call request configuration and options

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::headers::{GenericHeaders, HeaderField};

/// How the transport should decode the response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    #[default]
    Json,
    Text,
}

/// What the caller wants to observe from the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserveMode {
    /// Only the decoded body
    Body,
    /// Body, status and headers
    Response,
}

/// Configuration for a single call.
///
/// Built fresh for every request and threaded through the middleware
/// pipeline by value. The `with_*` helpers consume the config and hand
/// back a new one, so no stage ever sees another stage's edits in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestConfig {
    #[serde(default)]
    pub headers: GenericHeaders,

    #[serde(default)]
    pub with_credentials: bool,

    #[serde(default)]
    pub response_type: ResponseType,

    #[serde(default, rename = "baseURL", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or replace a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<HeaderField>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Drop a header entirely
    pub fn without_header(mut self, name: &str) -> Self {
        self.headers.remove(name);
        self
    }

    pub fn with_credentials(mut self, with_credentials: bool) -> Self {
        self.with_credentials = with_credentials;
        self
    }

    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Options for [`HttpClientAdapter::request`](crate::HttpClientAdapter::request)
///
/// `body: None` means "no body": it is never forwarded to the transport.
/// `Some(Value::Null)` is an explicit JSON `null` and is forwarded.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub config: Option<RequestConfig>,
    pub body: Option<Value>,
    pub return_full_response: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: RequestConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn full_response(mut self) -> Self {
        self.return_full_response = true;
        self
    }
}
