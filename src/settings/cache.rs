//! Single-flight cache for footer/site settings.
//!
//! # States
//! ```text
//! Empty ──subscribe──▶ Fetching ──success──▶ Populated (terminal)
//!                          │
//!                          └──failure──▶ Empty (next subscribe retries)
//! ```
//!
//! # Guarantees
//! - At most one fetch in flight, however many subscribers arrive
//! - On success every registered subscriber is notified once, in
//!   registration order; a subscriber released before its turn is skipped
//! - Failures are silent: subscribers are simply never called
//! - Never refreshed; lives as long as the owning application state
//!
//! The lock is never held across an await or while running a callback.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::oneshot;

use crate::content::{normalize_populated_record, Entity, FooterSettings};
use crate::observability::metrics;
use crate::upstream::{FetchError, FetchResult, Upstream, UpstreamRequest};

type Callback = Arc<dyn Fn(&FooterSettings) + Send + Sync>;

/// Observable cache state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Empty,
    Fetching,
    Populated,
}

enum Slot {
    Empty,
    Fetching,
    Populated(FooterSettings),
}

struct Shared {
    slot: Slot,
    subscribers: Vec<(u64, Callback)>,
    next_id: u64,
}

struct Inner {
    upstream: Arc<dyn Upstream>,
    request: UpstreamRequest,
    shared: Mutex<Shared>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_registered(&self, id: u64) -> bool {
        self.lock().subscribers.iter().any(|(sid, _)| *sid == id)
    }

    async fn fetch(&self) -> FetchResult<FooterSettings> {
        let raw = self.upstream.fetch(&self.request).await?;
        normalize_populated_record(&raw, FooterSettings::ENTITY)
            .ok_or_else(|| FetchError::NormalizationMiss(self.request.path.clone()))
    }

    async fn fetch_and_publish(&self) {
        match self.fetch().await {
            Ok(settings) => {
                let subscribers = {
                    let mut shared = self.lock();
                    shared.slot = Slot::Populated(settings.clone());
                    shared.subscribers.clone()
                };
                tracing::info!(subscribers = subscribers.len(), "Settings cache populated");
                metrics::record_settings_fetch("success");
                for (id, callback) in subscribers {
                    // An earlier callback may have released this one.
                    if self.is_registered(id) {
                        callback(&settings);
                    }
                }
            }
            Err(e) => {
                self.lock().slot = Slot::Empty;
                tracing::warn!(path = %self.request.path, error = %e, "Settings fetch failed, cache left empty");
                metrics::record_settings_fetch(e.kind());
            }
        }
    }
}

/// Process-lifetime settings cache. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SettingsCache {
    inner: Arc<Inner>,
}

impl SettingsCache {
    /// Create an empty cache that will fetch `request` on first subscribe.
    pub fn new(upstream: Arc<dyn Upstream>, request: UpstreamRequest) -> Self {
        Self {
            inner: Arc::new(Inner {
                upstream,
                request,
                shared: Mutex::new(Shared {
                    slot: Slot::Empty,
                    subscribers: Vec::new(),
                    next_id: 0,
                }),
            }),
        }
    }

    /// Register `callback` for the settings value.
    ///
    /// If the value is already cached the callback runs before this returns.
    /// Must be called within a Tokio runtime, since the first subscriber
    /// spawns the fetch.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&FooterSettings) + Send + Sync + 'static,
    {
        let callback: Callback = Arc::new(callback);

        let (id, cached, start_fetch) = {
            let mut shared = self.inner.lock();
            let id = shared.next_id;
            shared.next_id += 1;
            shared.subscribers.push((id, callback.clone()));

            match &shared.slot {
                Slot::Populated(settings) => (id, Some(settings.clone()), false),
                Slot::Fetching => (id, None, false),
                Slot::Empty => {
                    shared.slot = Slot::Fetching;
                    (id, None, true)
                }
            }
        };

        if let Some(settings) = cached {
            callback(&settings);
        } else if start_fetch {
            tracing::debug!(path = %self.inner.request.path, "Settings cache empty, fetching");
            let inner = self.inner.clone();
            tokio::spawn(async move {
                inner.fetch_and_publish().await;
            });
        }

        Subscription {
            cache: Arc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    /// The cached value, if populated.
    pub fn current(&self) -> Option<FooterSettings> {
        match &self.inner.lock().slot {
            Slot::Populated(settings) => Some(settings.clone()),
            _ => None,
        }
    }

    pub fn status(&self) -> CacheStatus {
        match self.inner.lock().slot {
            Slot::Empty => CacheStatus::Empty,
            Slot::Fetching => CacheStatus::Fetching,
            Slot::Populated(_) => CacheStatus::Populated,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    /// Subscribe and wait up to `timeout` for a value.
    ///
    /// Returns `None` if the fetch fails or is still running at the deadline.
    pub async fn wait_for_value(&self, timeout: Duration) -> Option<FooterSettings> {
        let (tx, rx) = oneshot::channel();
        let tx = Mutex::new(Some(tx));
        let subscription = self.subscribe(move |settings| {
            let sender = tx.lock().unwrap_or_else(PoisonError::into_inner).take();
            if let Some(sender) = sender {
                let _ = sender.send(settings.clone());
            }
        });

        let value = tokio::time::timeout(timeout, rx).await.ok().and_then(Result::ok);
        subscription.unsubscribe();
        value
    }
}

/// Handle for one registered callback. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes its callback"]
pub struct Subscription {
    cache: Weak<Inner>,
    id: Option<u64>,
}

impl Subscription {
    /// Remove the callback. Cache state and other subscribers are untouched.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        let Some(id) = self.id.take() else { return };
        if let Some(inner) = self.cache.upgrade() {
            inner.lock().subscribers.retain(|(sid, _)| *sid != id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::paths;
    use crate::upstream::mock::MockUpstream;
    use serde_json::json;
    use std::time::Instant;

    fn footer_body() -> serde_json::Value {
        json!({"data": {"company_name": "Acme Academy", "email": "hello@acme.test"}})
    }

    fn cache_with(mock: MockUpstream) -> (SettingsCache, Arc<MockUpstream>) {
        let mock = Arc::new(mock);
        let cache = SettingsCache::new(mock.clone(), UpstreamRequest::new(paths::FOOTER_SETTINGS));
        (cache, mock)
    }

    async fn wait_until(mut done: impl FnMut() -> bool) {
        let start = Instant::now();
        while !done() && start.elapsed() < Duration::from_secs(2) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn test_concurrent_subscribers_share_one_fetch() {
        let (cache, mock) = cache_with(
            MockUpstream::new().respond_after(paths::FOOTER_SETTINGS, Duration::from_millis(50), footer_body()),
        );

        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut subscriptions = Vec::new();
        for i in 0..10 {
            let seen = seen.clone();
            subscriptions.push(cache.subscribe(move |settings: &FooterSettings| {
                seen.lock().unwrap().push((i, settings.company_name.clone()));
            }));
        }
        assert_eq!(cache.status(), CacheStatus::Fetching);

        wait_until(|| seen.lock().unwrap().len() == 10).await;

        assert_eq!(mock.calls(paths::FOOTER_SETTINGS), 1);
        let seen = seen.lock().unwrap().clone();
        let expected: Vec<(i32, String)> = (0..10).map(|i| (i, "Acme Academy".to_string())).collect();
        assert_eq!(seen, expected);
        assert_eq!(cache.status(), CacheStatus::Populated);
    }

    #[tokio::test]
    async fn test_unsubscribe_during_fetch() {
        let (cache, _) = cache_with(
            MockUpstream::new().respond_after(paths::FOOTER_SETTINGS, Duration::from_millis(50), footer_body()),
        );

        let seen = Arc::new(Mutex::new(Vec::new()));
        let s1 = seen.clone();
        let first = cache.subscribe(move |_: &FooterSettings| s1.lock().unwrap().push("first"));
        let s2 = seen.clone();
        let second = cache.subscribe(move |_: &FooterSettings| s2.lock().unwrap().push("second"));
        let s3 = seen.clone();
        let _third = cache.subscribe(move |_: &FooterSettings| s3.lock().unwrap().push("third"));

        second.unsubscribe();
        assert_eq!(cache.subscriber_count(), 2);

        wait_until(|| seen.lock().unwrap().len() == 2).await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(*seen.lock().unwrap(), vec!["first", "third"]);
        drop(first);
        assert_eq!(cache.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_callback_can_release_a_later_subscriber() {
        let (cache, _) = cache_with(
            MockUpstream::new().respond_after(paths::FOOTER_SETTINGS, Duration::from_millis(50), footer_body()),
        );

        let seen = Arc::new(Mutex::new(Vec::new()));
        let victim: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let s1 = seen.clone();
        let v = victim.clone();
        let _first = cache.subscribe(move |_: &FooterSettings| {
            s1.lock().unwrap().push("first");
            let released = v.lock().unwrap().take();
            drop(released);
        });
        let s2 = seen.clone();
        *victim.lock().unwrap() = Some(cache.subscribe(move |_: &FooterSettings| s2.lock().unwrap().push("second")));
        let s3 = seen.clone();
        let _third = cache.subscribe(move |_: &FooterSettings| s3.lock().unwrap().push("third"));

        wait_until(|| seen.lock().unwrap().len() == 2).await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(*seen.lock().unwrap(), vec!["first", "third"]);
        assert_eq!(cache.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_populated_cache_notifies_immediately() {
        let (cache, mock) = cache_with(MockUpstream::new().respond(paths::FOOTER_SETTINGS, footer_body()));
        assert!(cache.wait_for_value(Duration::from_secs(1)).await.is_some());

        let seen = Arc::new(Mutex::new(None));
        let s = seen.clone();
        let _sub = cache.subscribe(move |settings: &FooterSettings| {
            *s.lock().unwrap() = Some(settings.company_name.clone());
        });

        // No await between subscribe and the check.
        assert_eq!(seen.lock().unwrap().as_deref(), Some("Acme Academy"));
        assert_eq!(mock.calls(paths::FOOTER_SETTINGS), 1);
        assert_eq!(cache.current().unwrap().email.as_deref(), Some("hello@acme.test"));
    }

    #[tokio::test]
    async fn test_failure_is_silent_and_retried() {
        let (cache, mock) = cache_with(
            MockUpstream::new().fail(paths::FOOTER_SETTINGS, FetchError::Network("refused".into())),
        );

        let called = Arc::new(Mutex::new(false));
        let c = called.clone();
        let _sub = cache.subscribe(move |_: &FooterSettings| *c.lock().unwrap() = true);

        wait_until(|| cache.status() == CacheStatus::Empty).await;
        assert_eq!(cache.status(), CacheStatus::Empty);
        assert!(!*called.lock().unwrap());
        assert!(cache.current().is_none());

        let _again = cache.subscribe(|_: &FooterSettings| {});
        wait_until(|| mock.calls(paths::FOOTER_SETTINGS) == 2).await;
        assert_eq!(mock.calls(paths::FOOTER_SETTINGS), 2);
    }

    #[tokio::test]
    async fn test_error_body_is_not_cached() {
        let (cache, _) = cache_with(MockUpstream::new().respond(paths::FOOTER_SETTINGS, json!({"message": "oops"})));
        assert!(cache.wait_for_value(Duration::from_millis(200)).await.is_none());
        assert_eq!(cache.status(), CacheStatus::Empty);
    }

    #[tokio::test]
    async fn test_instances_are_isolated() {
        let (a, mock_a) = cache_with(MockUpstream::new().respond(paths::FOOTER_SETTINGS, footer_body()));
        let (b, mock_b) = cache_with(MockUpstream::new().respond(paths::FOOTER_SETTINGS, footer_body()));

        assert!(a.wait_for_value(Duration::from_secs(1)).await.is_some());
        assert_eq!(b.status(), CacheStatus::Empty);
        assert_eq!(mock_a.calls(paths::FOOTER_SETTINGS), 1);
        assert_eq!(mock_b.calls(paths::FOOTER_SETTINGS), 0);
    }
}
