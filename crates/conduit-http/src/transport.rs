//! Transport boundary
//!
//! The adapter never talks to the network itself. It hands a fully
//! assembled [`TransportRequest`] to a [`Transport`] and gets back either a
//! response or a structured failure. HTTP error statuses are failures, not
//! plain responses, so both sides of the outcome carry status and headers.

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Method};
use serde_json::Value;

use crate::request::{ObserveMode, ResponseType};

/// Result of a single dispatch
pub type TransportOutcome = std::result::Result<TransportResponse, TransportFailure>;

/// Status reported when no HTTP response was received at all
pub const NETWORK_FAILURE_STATUS: u16 = 0;

/// Request as handed to the transport
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub with_credentials: bool,
    pub response_type: ResponseType,
    pub observe: ObserveMode,
    /// `None` means the request carries no body field at all
    pub body: Option<Value>,
}

/// Successful transport response
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: Option<String>,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Structured transport failure
#[derive(Debug, Clone)]
pub struct TransportFailure {
    pub status: u16,
    pub status_text: Option<String>,
    pub headers: HeaderMap,
    /// Decoded error body, or a description of the network error
    pub error: Value,
}

impl TransportFailure {
    /// Failure with no HTTP response behind it (connect error, timeout, ...)
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: NETWORK_FAILURE_STATUS,
            status_text: Some("Unknown Error".to_string()),
            headers: HeaderMap::new(),
            error: Value::String(message.into()),
        }
    }
}

/// Host transport that actually sends requests
#[async_trait]
pub trait Transport: Send + Sync {
    async fn dispatch(&self, request: TransportRequest) -> TransportOutcome;
}
