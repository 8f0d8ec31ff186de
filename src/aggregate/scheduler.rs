//! Concurrent fan-out / fan-in over independent upstream requests.
//!
//! # Responsibilities
//! - Issue every request of a batch concurrently
//! - Wait for every request to settle; never short-circuit on a failure
//! - Map each settled result onto its field, positionally
//! - Apply the per-field fallback policy in exactly one place
//!
//! # Design Decisions
//! - A batch of N requests always yields N results
//! - Failures are logged and counted, never propagated to renderers
//! - `resolve_with_fallback` is the only place where a failure turns into
//!   a default value

use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::{Map, Value};

use crate::content::{normalize_collection, normalize_record};
use crate::observability::metrics;
use crate::upstream::{FetchError, FetchResult, Upstream, UpstreamRequest};

/// Outcome of one request in a batch.
pub type Settled = FetchResult<Value>;

/// Expected shape of a field, with the envelope key hint for its entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Collection(String),
    Record(String),
}

impl Shape {
    /// Normalize `raw` into this shape. Empty results count as a miss.
    pub fn normalize(&self, raw: &Value) -> Option<Value> {
        match self {
            Shape::Collection(hint) => {
                let items: Vec<Value> = normalize_collection(raw, hint);
                (!items.is_empty()).then_some(Value::Array(items))
            }
            Shape::Record(hint) => normalize_record::<Map<String, Value>>(raw, hint)
                .filter(|map| !map.is_empty())
                .map(Value::Object),
        }
    }
}

/// One field of an untyped aggregation.
#[derive(Debug, Clone)]
pub struct FieldRequest {
    pub request: UpstreamRequest,
    pub fallback: Value,
    pub shape: Shape,
}

impl FieldRequest {
    pub fn collection(request: UpstreamRequest, hint: &str) -> Self {
        Self {
            request,
            fallback: Value::Array(Vec::new()),
            shape: Shape::Collection(hint.to_string()),
        }
    }

    pub fn record(request: UpstreamRequest, hint: &str, fallback: Value) -> Self {
        Self {
            request,
            fallback,
            shape: Shape::Record(hint.to_string()),
        }
    }
}

/// Runs batches of upstream requests.
#[derive(Clone)]
pub struct Aggregator {
    upstream: Arc<dyn Upstream>,
}

impl Aggregator {
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        Self { upstream }
    }

    /// Issue all requests concurrently and wait for every one to settle.
    ///
    /// `result[i]` always belongs to `requests[i]`.
    pub async fn settle_all(&self, requests: &[UpstreamRequest]) -> Vec<Settled> {
        join_all(requests.iter().map(|request| self.upstream.fetch(request))).await
    }

    /// Untyped aggregation: one value per field, fallback on any failure.
    pub async fn aggregate(&self, fields: Vec<FieldRequest>) -> Vec<Value> {
        let requests: Vec<UpstreamRequest> = fields.iter().map(|f| f.request.clone()).collect();
        let settled = self.settle_all(&requests).await;

        fields
            .into_iter()
            .zip(settled)
            .map(|(field, result)| {
                let FieldRequest { request, fallback, shape } = field;
                resolve_with_fallback(&request.path, result, fallback, |raw| shape.normalize(raw))
            })
            .collect()
    }
}

/// Turn a settled result into a field value.
///
/// Fulfilled and normalizable → the normalized value. Rejected, or
/// fulfilled but `normalize` yields `None` → `fallback`.
pub fn resolve_with_fallback<T, F>(path: &str, settled: Settled, fallback: T, normalize: F) -> T
where
    F: FnOnce(&Value) -> Option<T>,
{
    let outcome = settled.and_then(|raw| {
        normalize(&raw).ok_or_else(|| FetchError::NormalizationMiss(path.to_string()))
    });

    match outcome {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(path = %path, kind = e.kind(), error = %e, "Using fallback for field");
            metrics::record_fallback(path, e.kind());
            fallback
        }
    }
}

/// [`resolve_with_fallback`] for fields whose fallback is "absent".
pub fn resolve_optional<T, F>(path: &str, settled: Settled, normalize: F) -> Option<T>
where
    F: FnOnce(&Value) -> Option<T>,
{
    resolve_with_fallback(path, settled, None, |raw| normalize(raw).map(Some))
}
