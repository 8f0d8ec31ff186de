//! Upstream request description.

use std::time::Duration;

/// Freshness hint forwarded to the content API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheDirective {
    /// Let the upstream decide.
    #[default]
    Default,
    /// Always fetch fresh content.
    NoStore,
    /// Content may be reused for the given number of seconds.
    Revalidate(u64),
}

impl CacheDirective {
    /// `Cache-Control` header value for this directive, if any.
    pub fn header_value(&self) -> Option<String> {
        match self {
            CacheDirective::Default => None,
            CacheDirective::NoStore => Some("no-store".to_string()),
            CacheDirective::Revalidate(secs) => Some(format!("max-age={}", secs)),
        }
    }
}

/// A single GET against the content API. Stateless, built per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    /// Path relative to the configured base URL (e.g. `/courses`).
    pub path: String,
    /// Freshness hint.
    pub cache: CacheDirective,
    /// Hard deadline for the whole exchange; `None` uses the client default.
    pub deadline: Option<Duration>,
}

impl UpstreamRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            cache: CacheDirective::Default,
            deadline: None,
        }
    }

    pub fn with_cache(mut self, cache: CacheDirective) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_header_values() {
        assert_eq!(CacheDirective::Default.header_value(), None);
        assert_eq!(CacheDirective::NoStore.header_value().as_deref(), Some("no-store"));
        assert_eq!(
            CacheDirective::Revalidate(60).header_value().as_deref(),
            Some("max-age=60")
        );
    }

    #[test]
    fn test_builder() {
        let req = UpstreamRequest::new("/courses")
            .with_cache(CacheDirective::NoStore)
            .with_deadline(Duration::from_secs(3));
        assert_eq!(req.path, "/courses");
        assert_eq!(req.cache, CacheDirective::NoStore);
        assert_eq!(req.deadline, Some(Duration::from_secs(3)));
    }
}
