//! Client configuration

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{HttpError, Result};

/// Settings for the reqwest-backed transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout in milliseconds; none by default
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// HTTP/HTTPS proxy URL
    #[serde(default)]
    pub proxy: Option<String>,

    /// Custom user agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum redirects to follow (0 = no redirects)
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            connect_timeout_ms: default_connect_timeout_ms(),
            proxy: None,
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl HttpConfig {
    /// Create a new HTTP config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config for fast operations (5s timeout, 2s connect)
    pub fn fast() -> Self {
        Self {
            timeout_ms: Some(5_000),
            connect_timeout_ms: 2_000,
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Set proxy URL
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Everything needed to build an adapter over the reqwest transport
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every request path is joined onto; may be empty
    #[serde(default)]
    pub base_url: String,

    #[serde(default)]
    pub transport: HttpConfig,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            transport: HttpConfig::default(),
        }
    }

    /// Parse from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a TOML file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            warn!("Failed to read client config {}: {}", path.display(), e);
            HttpError::Config(format!("{}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }
}

// Default value functions for serde
fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    format!("Conduit/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_redirects() -> usize {
    10
}
