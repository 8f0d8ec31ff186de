//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - URLs must be absolute http(s)
//! - Budgets and timeouts must be positive; inner sitemap budgets must fit
//!   inside the outer one, and handler budgets inside the request timeout
//! - Socket addresses must parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: '{value}' is not an absolute http(s) URL")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },

    #[error("{field} ({budget_ms} ms) exceeds sitemap.outer_budget_ms ({outer_ms} ms)")]
    BudgetExceedsOuter {
        field: &'static str,
        budget_ms: u64,
        outer_ms: u64,
    },

    #[error("{field} ({budget_ms} ms) must be below timeouts.request_secs ({request_ms} ms)")]
    BudgetExceedsRequestTimeout {
        field: &'static str,
        budget_ms: u64,
        request_ms: u64,
    },

    #[error("observability.log_level: unknown level '{0}'")]
    UnknownLogLevel(String),
}

/// Validate `config`, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    check_url(&mut errors, "upstream.base_url", &config.upstream.base_url);
    check_url(&mut errors, "sitemap.site_url", &config.sitemap.site_url);

    let durations = [
        ("upstream.request_timeout_ms", config.upstream.request_timeout_ms),
        ("upstream.connect_timeout_ms", config.upstream.connect_timeout_ms),
        ("sitemap.outer_budget_ms", config.sitemap.outer_budget_ms),
        ("sitemap.courses_budget_ms", config.sitemap.courses_budget_ms),
        ("sitemap.blogs_budget_ms", config.sitemap.blogs_budget_ms),
        ("pages.request_budget_ms", config.pages.request_budget_ms),
        ("settings.fetch_budget_ms", config.settings.fetch_budget_ms),
        ("timeouts.request_secs", config.timeouts.request_secs),
    ];
    for (field, value) in durations {
        if value == 0 {
            errors.push(ValidationError::ZeroDuration { field });
        }
    }

    let outer_ms = config.sitemap.outer_budget_ms;
    for (field, budget_ms) in [
        ("sitemap.courses_budget_ms", config.sitemap.courses_budget_ms),
        ("sitemap.blogs_budget_ms", config.sitemap.blogs_budget_ms),
    ] {
        if budget_ms > outer_ms {
            errors.push(ValidationError::BudgetExceedsOuter {
                field,
                budget_ms,
                outer_ms,
            });
        }
    }

    // Handlers must finish on their own budgets before the router timeout cuts them off.
    if config.timeouts.request_secs > 0 {
        let request_ms = config.timeouts.request_secs.saturating_mul(1_000);
        for (field, budget_ms) in [
            ("sitemap.outer_budget_ms", config.sitemap.outer_budget_ms),
            ("pages.request_budget_ms", config.pages.request_budget_ms),
            ("settings.wait_ms", config.settings.wait_ms),
        ] {
            if budget_ms >= request_ms {
                errors.push(ValidationError::BudgetExceedsRequestTimeout {
                    field,
                    budget_ms,
                    request_ms,
                });
            }
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    let valid = Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false);
    if !valid {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}
