//! Bounded sitemap aggregation.
//!
//! # Algorithm
//! ```text
//! ┌──────────────────────── outer budget ────────────────────────┐
//! │ static entries (no I/O)                                      │
//! │ ┌── courses budget ──┐  ┌── blogs budget ──┐  (concurrent)    │
//! │ │ /courses           │  │ /blogs           │                  │
//! │ └────────────────────┘  └──────────────────┘                  │
//! │ failed/timed-out group → omitted                              │
//! └──────────────────────────────────────────────────────────────┘
//! outer budget elapsed → minimal static fallback list
//! otherwise            → stable sort by descending priority
//! ```
//!
//! The outer race drops the in-flight collection future, which also drops
//! (and so cancels) the inner fetches.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use url::Url;

use crate::aggregate::{resolve_with_fallback, Aggregator};
use crate::config::SitemapConfig;
use crate::content::{normalize_collection, paths, Addressable, Blog, Course, Entity};
use crate::observability::metrics;
use crate::sitemap::entry::{
    minimal_fallback_entries, sort_by_priority, static_entries, ChangeFrequency, SitemapEntry,
};
use crate::upstream::{CacheDirective, UpstreamRequest};

const COURSE_PREFIX: &str = "/course-details";
const COURSE_PRIORITY: f64 = 0.8;
const BLOG_PREFIX: &str = "/blog";
const BLOG_PRIORITY: f64 = 0.7;

/// Wall-clock budgets for one sitemap build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SitemapBudgets {
    pub outer: Duration,
    pub courses: Duration,
    pub blogs: Duration,
}

impl From<&SitemapConfig> for SitemapBudgets {
    fn from(config: &SitemapConfig) -> Self {
        Self {
            outer: Duration::from_millis(config.outer_budget_ms),
            courses: Duration::from_millis(config.courses_budget_ms),
            blogs: Duration::from_millis(config.blogs_budget_ms),
        }
    }
}

/// Builds the sitemap within a fixed wall-clock budget.
#[derive(Clone)]
pub struct SitemapBuilder {
    aggregator: Aggregator,
    site_url: Url,
    budgets: SitemapBudgets,
}

impl SitemapBuilder {
    pub fn new(aggregator: Aggregator, site_url: Url, budgets: SitemapBudgets) -> Self {
        Self {
            aggregator,
            site_url,
            budgets,
        }
    }

    pub fn from_config(aggregator: Aggregator, config: &SitemapConfig) -> Result<Self, url::ParseError> {
        let site_url = Url::parse(&config.site_url)?;
        Ok(Self::new(aggregator, site_url, SitemapBudgets::from(config)))
    }

    /// Build the sitemap, stamping static entries with the current time.
    pub async fn build(&self) -> Vec<SitemapEntry> {
        self.build_at(Utc::now()).await
    }

    /// Build the sitemap using `now` as the default modification time.
    pub async fn build_at(&self, now: DateTime<Utc>) -> Vec<SitemapEntry> {
        let start = Instant::now();

        match tokio::time::timeout(self.budgets.outer, self.collect(now)).await {
            Ok(mut entries) => {
                sort_by_priority(&mut entries);
                tracing::info!(
                    entries = entries.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Sitemap built"
                );
                metrics::record_sitemap_build("complete", entries.len());
                entries
            }
            Err(_) => {
                let entries = minimal_fallback_entries(&self.site_url, now);
                tracing::warn!(
                    budget_ms = self.budgets.outer.as_millis() as u64,
                    entries = entries.len(),
                    "Sitemap outer budget elapsed, serving minimal fallback"
                );
                metrics::record_sitemap_build("fallback", entries.len());
                entries
            }
        }
    }

    async fn collect(&self, now: DateTime<Utc>) -> Vec<SitemapEntry> {
        let mut entries = static_entries(&self.site_url, now);

        let requests = [
            UpstreamRequest::new(paths::COURSES)
                .with_cache(CacheDirective::NoStore)
                .with_deadline(self.budgets.courses),
            UpstreamRequest::new(paths::BLOGS)
                .with_cache(CacheDirective::NoStore)
                .with_deadline(self.budgets.blogs),
        ];
        let mut settled = self.aggregator.settle_all(&requests).await.into_iter();

        if let Some(result) = settled.next() {
            let courses: Vec<Course> = resolve_with_fallback(paths::COURSES, result, Vec::new(), |raw| {
                Some(normalize_collection(raw, Course::ENTITY))
            });
            entries.extend(self.dynamic_entries(COURSE_PREFIX, &courses, COURSE_PRIORITY, now));
        }

        if let Some(result) = settled.next() {
            let blogs: Vec<Blog> = resolve_with_fallback(paths::BLOGS, result, Vec::new(), |raw| {
                Some(normalize_collection(raw, Blog::ENTITY))
            });
            entries.extend(self.dynamic_entries(BLOG_PREFIX, &blogs, BLOG_PRIORITY, now));
        }

        entries
    }

    fn dynamic_entries<T: Addressable>(
        &self,
        prefix: &str,
        records: &[T],
        priority: f64,
        now: DateTime<Utc>,
    ) -> Vec<SitemapEntry> {
        records
            .iter()
            .filter_map(|record| {
                let Some(segment) = record.path_segment() else {
                    tracing::debug!(prefix, "Skipping record without slug or id");
                    return None;
                };
                let Some(url) = self.record_url(prefix, &segment) else {
                    tracing::debug!(prefix, segment = %segment, "Skipping record with unusable path segment");
                    return None;
                };
                let last_modified = record
                    .modified_at()
                    .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
                    .map(|ts| ts.with_timezone(&Utc))
                    .unwrap_or(now);
                Some(SitemapEntry::at(url, last_modified, ChangeFrequency::Weekly, priority))
            })
            .collect()
    }

    /// `prefix` under the site, plus `segment` as exactly one path segment.
    /// `/`, `?` and `#` inside the segment are percent-encoded.
    fn record_url(&self, prefix: &str, segment: &str) -> Option<Url> {
        if matches!(segment, "." | "..") {
            return None;
        }
        let mut url = self.site_url.join(prefix).ok()?;
        url.path_segments_mut().ok()?.pop_if_empty().push(segment);
        Some(url)
    }
}
