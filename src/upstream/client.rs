//! HTTP client for the content API.
//!
//! # Responsibilities
//! - Resolve request paths against the configured base URL
//! - Forward cache directives as `Cache-Control`
//! - Classify failures into the `FetchError` taxonomy
//! - Enforce the per-request deadline via the timeout guard

use std::time::{Duration, Instant};

use futures_util::future::BoxFuture;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use serde_json::Value;
use thiserror::Error;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::upstream::error::{FetchError, FetchResult};
use crate::upstream::request::{CacheDirective, UpstreamRequest};
use crate::upstream::timeout::with_deadline;
use crate::upstream::Upstream;

/// Errors raised while constructing the client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid upstream base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// reqwest-backed implementation of [`Upstream`].
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    /// Base URL without trailing slash.
    base_url: String,
    default_deadline: Duration,
    /// reqwest's own limit; its timeouts are reported against this.
    connect_timeout: Duration,
    default_cache: CacheDirective,
}

impl UpstreamClient {
    /// Create a new client from configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self, ClientError> {
        let parsed = url::Url::parse(&config.base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()?;

        let default_cache = if config.revalidate_secs == 0 {
            CacheDirective::NoStore
        } else {
            CacheDirective::Revalidate(config.revalidate_secs)
        };

        tracing::info!(
            base_url = %config.base_url,
            request_timeout_ms = config.request_timeout_ms,
            "Upstream client initialized"
        );

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_deadline: Duration::from_millis(config.request_timeout_ms),
            connect_timeout: Duration::from_millis(config.connect_timeout_ms),
            default_cache,
        })
    }

    /// Absolute URL for an API path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn execute(&self, request: &UpstreamRequest) -> FetchResult<Value> {
        let url = self.url_for(&request.path);
        let cache = match request.cache {
            CacheDirective::Default => self.default_cache,
            other => other,
        };

        let mut builder = self.http.get(&url).header(ACCEPT, "application/json");
        if let Some(value) = cache.header_value() {
            builder = builder.header(CACHE_CONTROL, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| FetchError::from_transport(e, self.connect_timeout))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http { status: status.as_u16() });
        }

        // A missing content type is tolerated; an explicit non-JSON one is not.
        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !content_type.contains("json") {
                return Err(FetchError::MalformedResponse(format!(
                    "unexpected content type '{}'",
                    content_type
                )));
            }
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::MalformedResponse(e.to_string()))
    }
}

impl Upstream for UpstreamClient {
    fn fetch<'a>(&'a self, request: &'a UpstreamRequest) -> BoxFuture<'a, FetchResult<Value>> {
        Box::pin(async move {
            let start = Instant::now();
            let deadline = request.deadline.unwrap_or(self.default_deadline);
            let result = with_deadline(deadline, self.execute(request)).await;

            metrics::record_upstream_request(&request.path, &result, start);
            if let Err(e) = &result {
                tracing::debug!(path = %request.path, kind = e.kind(), error = %e, "Upstream request failed");
            }
            result
        })
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url)
            .field("default_deadline", &self.default_deadline)
            .finish()
    }
}
