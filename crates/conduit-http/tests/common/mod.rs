//! Shared test transport that records requests and replays canned outcomes

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use conduit_http::{
    header::{HeaderMap, HeaderValue},
    Transport, TransportFailure, TransportOutcome, TransportRequest, TransportResponse,
};
use serde_json::Value;

/// In-memory transport: every dispatch is recorded and answered with the
/// configured outcome
#[derive(Clone)]
pub struct RecordingTransport {
    outcome: Arc<Mutex<TransportOutcome>>,
    requests: Arc<Mutex<Vec<TransportRequest>>>,
}

impl RecordingTransport {
    /// Answer every request with `200 OK` and the given body
    pub fn ok(body: Value) -> Self {
        Self::with_outcome(Ok(TransportResponse {
            status: 200,
            status_text: Some("OK".to_string()),
            headers: HeaderMap::new(),
            body,
        }))
    }

    pub fn status(status: u16, status_text: &str, body: Value) -> Self {
        Self::with_outcome(Ok(TransportResponse {
            status,
            status_text: Some(status_text.to_string()),
            headers: HeaderMap::new(),
            body,
        }))
    }

    pub fn ok_with_header(body: Value, name: &'static str, value: &'static str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        Self::with_outcome(Ok(TransportResponse {
            status: 200,
            status_text: Some("OK".to_string()),
            headers,
            body,
        }))
    }

    pub fn failure(status: u16, status_text: &str, error: Value) -> Self {
        Self::with_outcome(Err(TransportFailure {
            status,
            status_text: Some(status_text.to_string()),
            headers: HeaderMap::new(),
            error,
        }))
    }

    pub fn with_outcome(outcome: TransportOutcome) -> Self {
        Self {
            outcome: Arc::new(Mutex::new(outcome)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The single request dispatched so far; panics otherwise
    pub fn expect_one(&self) -> TransportRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn dispatch(&self, request: TransportRequest) -> TransportOutcome {
        self.requests.lock().unwrap().push(request);
        self.outcome.lock().unwrap().clone()
    }
}
