//! Request-config middleware pipeline

use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use futures::{future::BoxFuture, FutureExt};
use tracing::trace;

use crate::{
    error::Result,
    headers::{GenericHeaders, HeaderField},
    request::RequestConfig,
};

/// Pending output of one middleware stage
pub type StageOutput = BoxFuture<'static, Result<RequestConfig>>;

/// Async transformation of a request config before dispatch
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, config: RequestConfig) -> Result<RequestConfig>;
}

#[async_trait]
impl<F, Fut> Middleware for F
where
    F: Fn(RequestConfig) -> Fut + Send + Sync,
    Fut: Future<Output = Result<RequestConfig>> + Send + 'static,
{
    async fn handle(&self, config: RequestConfig) -> Result<RequestConfig> {
        (self)(config).await
    }
}

/// Combines stage outputs into the config used for dispatch.
///
/// This is the seam that decides how middleware results relate to each
/// other. Stages receive the same initial config; whether their outputs
/// are merged, chained or otherwise reduced is entirely up to the composer.
#[async_trait]
pub trait ConfigComposer: Send + Sync {
    async fn compose(
        &self,
        stages: Vec<StageOutput>,
        initial: RequestConfig,
    ) -> Result<RequestConfig>;
}

/// Default composer: runs every stage concurrently and overlays what each
/// stage changed, in registration order.
///
/// A stage's change is any field that differs from the initial config.
/// Later stages win on conflicts. A header the stage removed is removed.
/// The first failing stage fails the whole composition.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeComposer;

#[async_trait]
impl ConfigComposer for MergeComposer {
    async fn compose(
        &self,
        stages: Vec<StageOutput>,
        initial: RequestConfig,
    ) -> Result<RequestConfig> {
        if stages.is_empty() {
            return Ok(initial);
        }

        let outputs = futures::future::try_join_all(stages).await?;
        Ok(outputs
            .into_iter()
            .fold(initial.clone(), |merged, stage| overlay(merged, &initial, stage)))
    }
}

fn overlay(merged: RequestConfig, initial: &RequestConfig, stage: RequestConfig) -> RequestConfig {
    RequestConfig {
        headers: overlay_headers(merged.headers, &initial.headers, stage.headers),
        with_credentials: if stage.with_credentials != initial.with_credentials {
            stage.with_credentials
        } else {
            merged.with_credentials
        },
        response_type: if stage.response_type != initial.response_type {
            stage.response_type
        } else {
            merged.response_type
        },
        base_url: if stage.base_url != initial.base_url {
            stage.base_url
        } else {
            merged.base_url
        },
    }
}

fn overlay_headers(
    mut merged: GenericHeaders,
    initial: &GenericHeaders,
    stage: GenericHeaders,
) -> GenericHeaders {
    for name in initial.keys() {
        if !stage.contains_key(name) {
            merged.remove(name);
        }
    }
    for (name, field) in stage {
        if initial.get(&name) != Some(&field) {
            merged.insert(name, field);
        }
    }
    merged
}

/// Middleware that adds a fixed set of headers
#[derive(Debug, Clone, Default)]
pub struct StaticHeaders {
    headers: GenericHeaders,
}

impl StaticHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<HeaderField>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

#[async_trait]
impl Middleware for StaticHeaders {
    async fn handle(&self, config: RequestConfig) -> Result<RequestConfig> {
        Ok(self
            .headers
            .iter()
            .fold(config, |config, (name, value)| {
                config.with_header(name.clone(), value.clone())
            }))
    }
}

/// Ordered middleware list plus the composer that reduces it.
///
/// Immutable once built and cheap to clone.
#[derive(Clone)]
pub struct ConfigPipeline {
    middleware: Arc<[Arc<dyn Middleware>]>,
    composer: Arc<dyn ConfigComposer>,
}

impl Default for ConfigPipeline {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ConfigPipeline {
    /// Pipeline using [`MergeComposer`]
    pub fn new(middleware: Vec<Arc<dyn Middleware>>) -> Self {
        Self::with_composer(middleware, Arc::new(MergeComposer))
    }

    pub fn with_composer(
        middleware: Vec<Arc<dyn Middleware>>,
        composer: Arc<dyn ConfigComposer>,
    ) -> Self {
        Self {
            middleware: middleware.into(),
            composer,
        }
    }

    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    /// Produce the dispatch-time config.
    ///
    /// With no middleware the initial config is returned as-is and the
    /// composer is not consulted.
    pub async fn resolve(&self, initial: RequestConfig) -> Result<RequestConfig> {
        if self.middleware.is_empty() {
            return Ok(initial);
        }

        trace!("Resolving request config through {} middleware", self.middleware.len());

        let stages: Vec<StageOutput> = self
            .middleware
            .iter()
            .map(|middleware| {
                let middleware = Arc::clone(middleware);
                let config = initial.clone();
                async move { middleware.handle(config).await }.boxed()
            })
            .collect();

        self.composer.compose(stages, initial).await
    }
}
