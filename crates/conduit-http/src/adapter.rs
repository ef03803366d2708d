//! HTTP client adapter
//!
//! Drives one request end to end: seeds the per-call config, resolves it
//! through the middleware pipeline, assembles the transport request and
//! shapes the outcome either as a bare body or as a [`ResponseEnvelope`].

use std::sync::Arc;

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    client::ReqwestTransport,
    config::ClientConfig,
    envelope::{build_envelope, DispatchedRequest, ResponseEnvelope},
    error::{HttpError, Result},
    filter::{BracketFilterCodec, FilterQuery, FilterQueryCodec},
    headers::to_transport_headers,
    middleware::{ConfigComposer, ConfigPipeline, Middleware, MergeComposer},
    request::{ObserveMode, RequestConfig, RequestOptions},
    transport::{Transport, TransportRequest},
    urls::compose_url,
};

/// Result of [`HttpClientAdapter::request`]
#[derive(Debug, Clone)]
pub enum RequestResult<T> {
    Body(T),
    Envelope(ResponseEnvelope),
}

impl<T> RequestResult<T> {
    pub fn into_body(self) -> Option<T> {
        match self {
            RequestResult::Body(body) => Some(body),
            RequestResult::Envelope(_) => None,
        }
    }

    pub fn into_envelope(self) -> Option<ResponseEnvelope> {
        match self {
            RequestResult::Body(_) => None,
            RequestResult::Envelope(envelope) => Some(envelope),
        }
    }
}

/// Request ready to hand to the transport, plus what the envelope echoes
struct PreparedRequest {
    transport: TransportRequest,
    effective: RequestConfig,
}

/// HTTP client adapter over a pluggable [`Transport`].
///
/// Holds only immutable state, so one instance can serve any number of
/// concurrent calls. Cloning is cheap.
#[derive(Clone)]
pub struct HttpClientAdapter {
    transport: Arc<dyn Transport>,
    base_url: String,
    middleware: Vec<Arc<dyn Middleware>>,
    composer: Arc<dyn ConfigComposer>,
    pipeline: ConfigPipeline,
    filter_codec: Arc<dyn FilterQueryCodec>,
}

impl HttpClientAdapter {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            middleware: Vec::new(),
            composer: Arc::new(MergeComposer),
            pipeline: ConfigPipeline::default(),
            filter_codec: Arc::new(BracketFilterCodec),
        }
    }

    /// Build an adapter over a [`ReqwestTransport`]
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.transport.clone())?;
        Ok(Self::new(Arc::new(transport), config.base_url.clone()))
    }

    /// Register a middleware; registration order is kept
    pub fn with_middleware(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middleware.push(Arc::new(middleware));
        self.rebuild_pipeline()
    }

    /// Replace the composer that reduces middleware outputs
    pub fn with_composer(mut self, composer: impl ConfigComposer + 'static) -> Self {
        self.composer = Arc::new(composer);
        self.rebuild_pipeline()
    }

    pub fn with_filter_codec(mut self, codec: impl FilterQueryCodec + 'static) -> Self {
        self.filter_codec = Arc::new(codec);
        self
    }

    fn rebuild_pipeline(mut self) -> Self {
        self.pipeline =
            ConfigPipeline::with_composer(self.middleware.clone(), Arc::clone(&self.composer));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn middleware_count(&self) -> usize {
        self.pipeline.len()
    }

    /// Generic entry point; the result shape follows `return_full_response`
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Option<&str>,
        path: &str,
        options: RequestOptions,
        filter: Option<&FilterQuery>,
    ) -> Result<RequestResult<T>> {
        if options.return_full_response {
            self.fetch_envelope(method, path, options, filter)
                .await
                .map(RequestResult::Envelope)
        } else {
            self.fetch_body(method, path, options, filter)
                .await
                .map(RequestResult::Body)
        }
    }

    /// Dispatch and return only the decoded body.
    ///
    /// Transport failures propagate as [`HttpError::Transport`].
    pub async fn fetch_body<T: DeserializeOwned>(
        &self,
        method: Option<&str>,
        path: &str,
        options: RequestOptions,
        filter: Option<&FilterQuery>,
    ) -> Result<T> {
        let prepared = self
            .prepare(method, path, options, filter, ObserveMode::Body)
            .await?;

        let response = self
            .transport
            .dispatch(prepared.transport)
            .await
            .map_err(HttpError::Transport)?;

        Ok(serde_json::from_value(response.body)?)
    }

    /// Dispatch and return the full envelope.
    ///
    /// Transport failures become an envelope carrying the error status and
    /// payload; only pipeline and input errors fail the call.
    pub async fn fetch_envelope(
        &self,
        method: Option<&str>,
        path: &str,
        options: RequestOptions,
        filter: Option<&FilterQuery>,
    ) -> Result<ResponseEnvelope> {
        let prepared = self
            .prepare(method, path, options, filter, ObserveMode::Response)
            .await?;

        let url = prepared.transport.url.clone();
        let method = prepared.transport.method.clone();
        let body = prepared.transport.body.clone();

        let outcome = self.transport.dispatch(prepared.transport).await;
        if let Err(failure) = &outcome {
            warn!("HTTP {} {} returned {}", method, url, failure.status);
        }

        Ok(build_envelope(
            outcome,
            &prepared.effective,
            DispatchedRequest {
                url: &url,
                method: &method,
                body: body.as_ref(),
            },
        ))
    }

    async fn prepare(
        &self,
        method: Option<&str>,
        path: &str,
        options: RequestOptions,
        filter: Option<&FilterQuery>,
        observe: ObserveMode,
    ) -> Result<PreparedRequest> {
        let method = normalize_method(method)?;
        let filter_suffix = filter
            .map(|query| self.filter_codec.serialize(query))
            .unwrap_or_default();

        let initial = RequestConfig {
            base_url: Some(self.base_url.clone()),
            ..options.config.unwrap_or_default()
        };
        let effective = self.pipeline.resolve(initial).await?;

        let base_url = effective.base_url.as_deref().unwrap_or(&self.base_url);
        let url = compose_url(base_url, path, &filter_suffix);
        let headers = to_transport_headers(Some(&effective.headers))?;

        debug!("HTTP {}: {}", method, url);

        Ok(PreparedRequest {
            transport: TransportRequest {
                method,
                url,
                headers,
                with_credentials: effective.with_credentials,
                response_type: effective.response_type,
                observe,
                body: options.body,
            },
            effective,
        })
    }

    /// GET, body only
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        config: Option<RequestConfig>,
        filter: Option<&FilterQuery>,
    ) -> Result<T> {
        self.fetch_body(Some("GET"), path, options(config, None), filter)
            .await
    }

    /// POST, body only
    pub async fn post<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        config: Option<RequestConfig>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.fetch_body(Some("POST"), path, options(config, encode_body(body)?), None)
            .await
    }

    /// PUT, body only
    pub async fn put<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        config: Option<RequestConfig>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.fetch_body(Some("PUT"), path, options(config, encode_body(body)?), None)
            .await
    }

    /// PATCH, body only
    pub async fn patch<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        config: Option<RequestConfig>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.fetch_body(Some("PATCH"), path, options(config, encode_body(body)?), None)
            .await
    }

    /// DELETE, body only
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        config: Option<RequestConfig>,
        filter: Option<&FilterQuery>,
    ) -> Result<T> {
        self.fetch_body(Some("DELETE"), path, options(config, None), filter)
            .await
    }

    /// GET, full envelope
    pub async fn get_request(
        &self,
        path: &str,
        config: Option<RequestConfig>,
        filter: Option<&FilterQuery>,
    ) -> Result<ResponseEnvelope> {
        self.fetch_envelope(Some("GET"), path, options(config, None), filter)
            .await
    }

    /// POST, full envelope
    pub async fn post_request<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
        config: Option<RequestConfig>,
    ) -> Result<ResponseEnvelope> {
        self.fetch_envelope(Some("POST"), path, options(config, encode_body(body)?), None)
            .await
    }

    /// PUT, full envelope
    pub async fn put_request<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
        config: Option<RequestConfig>,
    ) -> Result<ResponseEnvelope> {
        self.fetch_envelope(Some("PUT"), path, options(config, encode_body(body)?), None)
            .await
    }

    /// PATCH, full envelope
    pub async fn patch_request<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
        config: Option<RequestConfig>,
    ) -> Result<ResponseEnvelope> {
        self.fetch_envelope(Some("PATCH"), path, options(config, encode_body(body)?), None)
            .await
    }

    /// DELETE, full envelope
    pub async fn delete_request(
        &self,
        path: &str,
        config: Option<RequestConfig>,
    ) -> Result<ResponseEnvelope> {
        self.fetch_envelope(Some("DELETE"), path, options(config, None), None)
            .await
    }

    /// Resolve `url` against the base URL and decode its filter query
    pub fn parse_url_to_filter_query(&self, url: &str) -> Result<FilterQuery> {
        let resolved = if self.base_url.is_empty() {
            url::Url::parse(url)
        } else {
            url::Url::parse(&self.base_url).and_then(|base| base.join(url))
        }
        .map_err(|e| HttpError::InvalidUrl(format!("{url}: {e}")))?;

        let search = resolved.query().map(|q| format!("?{q}")).unwrap_or_default();
        self.filter_codec.deserialize(&search)
    }
}

/// Uppercase the method; a missing or blank one means GET
fn normalize_method(method: Option<&str>) -> Result<Method> {
    match method.map(str::trim).filter(|m| !m.is_empty()) {
        None => Ok(Method::GET),
        Some(method) => Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .map_err(|_| HttpError::InvalidMethod(method.to_string())),
    }
}

fn encode_body<B: Serialize + ?Sized>(body: Option<&B>) -> Result<Option<Value>> {
    body.map(serde_json::to_value).transpose().map_err(HttpError::from)
}

fn options(config: Option<RequestConfig>, body: Option<Value>) -> RequestOptions {
    RequestOptions {
        config,
        body,
        return_full_response: false,
    }
}
