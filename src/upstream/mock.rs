//! In-memory `Upstream` used by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::upstream::error::{FetchError, FetchResult};
use crate::upstream::request::UpstreamRequest;
use crate::upstream::timeout::with_deadline;
use crate::upstream::Upstream;

#[derive(Clone)]
struct Scripted {
    delay: Duration,
    result: FetchResult<Value>,
}

/// Scripted responses keyed by path. Unknown paths answer 404.
#[derive(Default)]
pub struct MockUpstream {
    routes: HashMap<String, Scripted>,
    calls: Mutex<HashMap<String, Arc<AtomicUsize>>>,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, path: &str, body: Value) -> Self {
        self.script(path, Duration::ZERO, Ok(body))
    }

    pub fn respond_after(self, path: &str, delay: Duration, body: Value) -> Self {
        self.script(path, delay, Ok(body))
    }

    pub fn fail(self, path: &str, error: FetchError) -> Self {
        self.script(path, Duration::ZERO, Err(error))
    }

    pub fn fail_after(self, path: &str, delay: Duration, error: FetchError) -> Self {
        self.script(path, delay, Err(error))
    }

    fn script(mut self, path: &str, delay: Duration, result: FetchResult<Value>) -> Self {
        self.routes.insert(path.to_string(), Scripted { delay, result });
        self
    }

    /// Number of fetches issued for `path`.
    pub fn calls(&self, path: &str) -> usize {
        self.counter(path).load(Ordering::SeqCst)
    }

    fn counter(&self, path: &str) -> Arc<AtomicUsize> {
        let mut calls = self.calls.lock().unwrap();
        calls.entry(path.to_string()).or_default().clone()
    }
}

impl Upstream for MockUpstream {
    fn fetch<'a>(&'a self, request: &'a UpstreamRequest) -> BoxFuture<'a, FetchResult<Value>> {
        Box::pin(async move {
            self.counter(&request.path).fetch_add(1, Ordering::SeqCst);
            let scripted = self.routes.get(&request.path).cloned().unwrap_or(Scripted {
                delay: Duration::ZERO,
                result: Err(FetchError::Http { status: 404 }),
            });
            let exchange = async move {
                tokio::time::sleep(scripted.delay).await;
                scripted.result
            };
            match request.deadline {
                Some(deadline) => with_deadline(deadline, exchange).await,
                None => exchange.await,
            }
        })
    }
}
