//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define aggregator metrics (upstream calls, fallbacks, sitemap builds)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `upstream_requests_total` (counter): upstream calls by path, outcome
//! - `upstream_request_duration_seconds` (histogram): upstream latency by path
//! - `field_fallbacks_total` (counter): fields that fell back, by path, kind
//! - `sitemap_builds_total` (counter): builds by outcome (complete/fallback)
//! - `sitemap_entries` (gauge): entries in the last built sitemap
//! - `settings_fetches_total` (counter): settings fetches by outcome
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op, which keeps unit tests free of setup
//! - Outcome labels reuse `FetchError::kind()`

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::upstream::FetchResult;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_upstream_request<T>(path: &str, result: &FetchResult<T>, start: Instant) {
    let outcome = match result {
        Ok(_) => "success",
        Err(e) => e.kind(),
    };
    counter!("upstream_requests_total", "path" => path.to_string(), "outcome" => outcome).increment(1);
    histogram!("upstream_request_duration_seconds", "path" => path.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_fallback(path: &str, kind: &'static str) {
    counter!("field_fallbacks_total", "path" => path.to_string(), "kind" => kind).increment(1);
}

pub fn record_sitemap_build(outcome: &'static str, entries: usize) {
    counter!("sitemap_builds_total", "outcome" => outcome).increment(1);
    gauge!("sitemap_entries").set(entries as f64);
}

pub fn record_settings_fetch(outcome: &'static str) {
    counter!("settings_fetches_total", "outcome" => outcome).increment(1);
}
