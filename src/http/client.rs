//! reqwest-backed call executor
//!
//! Dispatches a [`RequestBuilder`] over HTTP and snapshots the result into
//! the immutable [`Response`] view. The async path shares one
//! `reqwest::Client`; the blocking path lazily builds a
//! `reqwest::blocking::Client` (which owns its own internal runtime) on
//! first use, so the executor can be constructed inside or outside an async
//! context.

use super::CallExecutor;
use crate::error::{Error, Result};
use crate::request::RequestBuilder;
use crate::response::Response;
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Configuration for the HTTP call executor
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Default headers applied to every request
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            default_headers: HashMap::new(),
            user_agent: format!("sdkcore/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    /// Create a new config builder
    pub fn builder() -> HttpConfigBuilder {
        HttpConfigBuilder::default()
    }
}

/// Builder for [`HttpConfig`]
#[derive(Debug, Default)]
pub struct HttpConfigBuilder {
    config: HttpConfig,
}

impl HttpConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpConfig {
        self.config
    }
}

/// HTTP implementation of [`CallExecutor`]
pub struct HttpCallExecutor {
    client: reqwest::Client,
    blocking: OnceCell<reqwest::blocking::Client>,
    config: HttpConfig,
}

impl HttpCallExecutor {
    /// Create an executor with default configuration
    pub fn new() -> Self {
        Self::with_config(HttpConfig::default())
    }

    /// Create an executor with custom configuration
    pub fn with_config(config: HttpConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            blocking: OnceCell::new(),
            config,
        }
    }

    fn blocking_client(&self) -> Result<&reqwest::blocking::Client> {
        self.blocking.get_or_try_init(|| {
            reqwest::blocking::Client::builder()
                .timeout(self.config.timeout)
                .user_agent(&self.config.user_agent)
                .build()
                .map_err(Error::Http)
        })
    }

    fn map_transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            }
        } else {
            Error::Http(e)
        }
    }
}

impl Default for HttpCallExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HttpCallExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCallExecutor")
            .field("config", &self.config)
            .field("has_blocking_client", &self.blocking.get().is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CallExecutor for HttpCallExecutor {
    fn execute(&self, request: &RequestBuilder) -> Result<Response> {
        let url = request.url();
        debug!(method = %request.method(), %url, "executing blocking call");

        let client = self.blocking_client()?;
        let mut req = client.request(request.method().clone(), &url);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }
        for (key, value) in request.headers() {
            req = req.header(key.as_str(), value.as_str());
        }

        let query = request.query_pairs();
        if !query.is_empty() {
            req = req.query(&query);
        }
        if let Some(body) = request.body_ref().to_value() {
            req = req.json(&body);
        }

        let response = req.send().map_err(|e| self.map_transport_error(e))?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().map_err(Error::Http)?;

        debug!(%status, "blocking call completed");
        Ok(Response::new(status, headers, body))
    }

    async fn execute_async(&self, request: &RequestBuilder) -> Result<Response> {
        let url = request.url();
        debug!(method = %request.method(), %url, "executing async call");

        let mut req = self.client.request(request.method().clone(), &url);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }
        for (key, value) in request.headers() {
            req = req.header(key.as_str(), value.as_str());
        }

        let query = request.query_pairs();
        if !query.is_empty() {
            req = req.query(&query);
        }
        if let Some(body) = request.body_ref().to_value() {
            req = req.json(&body);
        }

        let response = req.send().await.map_err(|e| self.map_transport_error(e))?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(Error::Http)?;

        debug!(%status, "async call completed");
        Ok(Response::new(status, headers, body))
    }
}
