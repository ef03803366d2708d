//! HTTP client adapter with a pluggable request-config pipeline
//!
//! Sends requests through a host [`Transport`] after running the per-call
//! [`RequestConfig`] through an ordered list of async [`Middleware`], and
//! normalizes every outcome into either the bare response body or a
//! uniform [`ResponseEnvelope`].
//!
//! ## Features
//!
//! - **Two result shapes**: `fetch_body` / `get` / `post` ... return the
//!   decoded body; `fetch_envelope` / `get_request` / `post_request` ...
//!   return status, headers and echoed request, turning HTTP failures into
//!   values
//! - **Swappable composition**: how middleware outputs combine is decided
//!   by a [`ConfigComposer`]; [`MergeComposer`] is the default
//! - **Filter queries**: structured filters and paging serialized by a
//!   [`FilterQueryCodec`]
//! - **Transport-agnostic**: [`ReqwestTransport`] for production, any
//!   [`Transport`] impl for tests

pub mod adapter;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod headers;
pub mod middleware;
pub mod request;
pub mod transport;
pub mod urls;

pub use adapter::{HttpClientAdapter, RequestResult};
pub use client::{shared_transport, ReqwestTransport};
pub use config::{ClientConfig, HttpConfig};
pub use envelope::{build_envelope, DispatchedRequest, EchoedRequest, ResponseEnvelope};
pub use error::{HttpError, Result};
pub use filter::{
    BracketFilterCodec, FilterCondition, FilterOperator, FilterQuery, FilterQueryCodec,
    Pagination, SortDirection,
};
pub use headers::{from_transport_headers, to_transport_headers, GenericHeaders, HeaderField};
pub use middleware::{
    ConfigComposer, ConfigPipeline, MergeComposer, Middleware, StageOutput, StaticHeaders,
};
pub use request::{ObserveMode, RequestConfig, RequestOptions, ResponseType};
pub use transport::{
    Transport, TransportFailure, TransportOutcome, TransportRequest, TransportResponse,
    NETWORK_FAILURE_STATUS,
};
pub use urls::compose_url;

/// Re-export commonly used types
pub use reqwest::{header, Method, StatusCode};
