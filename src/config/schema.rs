//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! content aggregator. All types derive Serde traits for deserialization
//! from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Content API client settings.
    pub upstream: UpstreamConfig,

    /// Sitemap site URL and budgets.
    pub sitemap: SitemapConfig,

    /// Page loader settings.
    pub pages: PagesConfig,

    /// Footer settings cache.
    pub settings: SettingsConfig,

    /// Server-side timeouts.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Content API client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the content API (e.g., "https://api.example.com/v1").
    pub base_url: String,

    /// Default per-request deadline in milliseconds.
    pub request_timeout_ms: u64,

    /// TCP connect timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// Default `max-age` sent upstream. Zero means `no-store`.
    pub revalidate_secs: u64,

    /// User-Agent header for upstream requests.
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:4000".to_string(),
            request_timeout_ms: 5_000,
            connect_timeout_ms: 2_000,
            revalidate_secs: 60,
            user_agent: format!("content-aggregator/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Sitemap configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Public site URL that sitemap entries are rooted at.
    pub site_url: String,

    /// Wall-clock budget for the whole build.
    pub outer_budget_ms: u64,

    /// Budget for the course listing fetch.
    pub courses_budget_ms: u64,

    /// Budget for the blog listing fetch.
    pub blogs_budget_ms: u64,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            site_url: "http://localhost:3000".to_string(),
            outer_budget_ms: 5_000,
            courses_budget_ms: 3_000,
            blogs_budget_ms: 2_000,
        }
    }
}

/// Page loader configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PagesConfig {
    /// Deadline applied to every fetch of a page load.
    pub request_budget_ms: u64,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            request_budget_ms: 4_000,
        }
    }
}

/// Footer settings cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// Deadline for the single settings fetch.
    pub fetch_budget_ms: u64,

    /// How long the footer endpoint waits for a value before answering 204.
    pub wait_ms: u64,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            fetch_budget_ms: 3_000,
            wait_ms: 1_500,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.sitemap.outer_budget_ms, 5_000);
        assert_eq!(config.sitemap.courses_budget_ms, 3_000);
        assert_eq!(config.sitemap.blogs_budget_ms, 2_000);
        assert!(config.upstream.user_agent.starts_with("content-aggregator/"));
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [upstream]
            base_url = "https://cms.example.com/api"

            [sitemap]
            site_url = "https://academy.example"
            blogs_budget_ms = 1500
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.base_url, "https://cms.example.com/api");
        assert_eq!(config.upstream.request_timeout_ms, 5_000);
        assert_eq!(config.sitemap.blogs_budget_ms, 1_500);
        assert_eq!(config.sitemap.outer_budget_ms, 5_000);
    }
}
