//! Uniform response envelope for full-response mode

use reqwest::{header::HeaderMap, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::Result,
    headers::{from_transport_headers, GenericHeaders},
    request::{RequestConfig, ResponseType},
    transport::TransportOutcome,
};

/// Echo of the request that produced an envelope.
///
/// `headers` is rebuilt from the *response* headers, not the ones that were
/// sent.
#[derive(Debug, Clone, PartialEq)]
pub struct EchoedRequest {
    pub url: String,
    pub method: Method,
    pub data: Option<Value>,
    pub headers: GenericHeaders,
    pub with_credentials: bool,
    pub response_type: ResponseType,
    pub base_url: Option<String>,
}

/// Response shape shared by successful and failed calls
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    pub data: Value,
    pub status: u16,
    pub status_text: String,
    /// Transport headers, exactly as received
    pub headers: HeaderMap,
    pub config: EchoedRequest,
}

impl ResponseEnvelope {
    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode `data` into a typed value
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}

/// Request-side facts the envelope echoes back
#[derive(Debug, Clone, Copy)]
pub struct DispatchedRequest<'a> {
    pub url: &'a str,
    pub method: &'a Method,
    pub body: Option<&'a Value>,
}

/// Fold a transport outcome into an envelope.
///
/// Success and failure produce the same shape; a failure's error payload
/// lands in `data`.
pub fn build_envelope(
    outcome: TransportOutcome,
    effective: &RequestConfig,
    dispatched: DispatchedRequest<'_>,
) -> ResponseEnvelope {
    let (data, status, status_text, headers) = match outcome {
        Ok(response) => (
            response.body,
            response.status,
            response.status_text,
            response.headers,
        ),
        Err(failure) => (
            failure.error,
            failure.status,
            failure.status_text,
            failure.headers,
        ),
    };

    let config = EchoedRequest {
        url: dispatched.url.to_string(),
        method: dispatched.method.clone(),
        data: dispatched.body.cloned(),
        headers: from_transport_headers(&headers),
        with_credentials: effective.with_credentials,
        response_type: effective.response_type,
        base_url: effective.base_url.clone(),
    };

    ResponseEnvelope {
        data,
        status,
        status_text: status_text.unwrap_or_default(),
        headers,
        config,
    }
}
