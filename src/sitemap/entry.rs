//! Sitemap entries and the static route tables.

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

/// `<changefreq>` values from the sitemaps.org protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

/// A single `<url>` in the sitemap.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    /// Absolute URL.
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    /// Always within `[0.0, 1.0]`.
    pub priority: f64,
}

impl SitemapEntry {
    /// Build an entry for `path` under `site`. Returns `None` if the joined
    /// URL is not valid.
    pub fn new(
        site: &Url,
        path: &str,
        last_modified: DateTime<Utc>,
        change_frequency: ChangeFrequency,
        priority: f64,
    ) -> Option<Self> {
        let url = site.join(path).ok()?;
        Some(Self::at(url, last_modified, change_frequency, priority))
    }

    /// Build an entry for an already-resolved absolute URL.
    pub fn at(url: Url, last_modified: DateTime<Utc>, change_frequency: ChangeFrequency, priority: f64) -> Self {
        let priority = if priority.is_finite() { priority.clamp(0.0, 1.0) } else { 0.5 };
        Self {
            url: url.to_string(),
            last_modified,
            change_frequency,
            priority,
        }
    }
}

/// Static page metadata.
#[derive(Debug, Clone, Copy)]
pub struct StaticRoute {
    pub path: &'static str,
    pub priority: f64,
    pub change_frequency: ChangeFrequency,
}

const fn route(path: &'static str, priority: f64, change_frequency: ChangeFrequency) -> StaticRoute {
    StaticRoute { path, priority, change_frequency }
}

/// Pages always listed, before any dynamic content.
pub const STATIC_ROUTES: &[StaticRoute] = &[
    route("/", 1.0, ChangeFrequency::Daily),
    route("/courses", 0.9, ChangeFrequency::Daily),
    route("/blog", 0.8, ChangeFrequency::Daily),
    route("/corporate-training", 0.8, ChangeFrequency::Monthly),
    route("/on-job-support", 0.8, ChangeFrequency::Monthly),
    route("/about-us", 0.7, ChangeFrequency::Monthly),
    route("/contact-us", 0.7, ChangeFrequency::Monthly),
    route("/interview-questions", 0.7, ChangeFrequency::Weekly),
    route("/terms-and-conditions", 0.3, ChangeFrequency::Yearly),
    route("/terms-and-conditions/instructor", 0.3, ChangeFrequency::Yearly),
];

/// Returned verbatim when the whole build exceeds its outer budget.
pub const MINIMAL_FALLBACK_ROUTES: &[StaticRoute] = &[
    route("/", 1.0, ChangeFrequency::Daily),
    route("/courses", 0.9, ChangeFrequency::Daily),
    route("/blog", 0.8, ChangeFrequency::Daily),
    route("/corporate-training", 0.8, ChangeFrequency::Monthly),
    route("/on-job-support", 0.8, ChangeFrequency::Monthly),
    route("/about-us", 0.7, ChangeFrequency::Monthly),
    route("/contact-us", 0.7, ChangeFrequency::Monthly),
    route("/terms-and-conditions", 0.3, ChangeFrequency::Yearly),
    route("/terms-and-conditions/instructor", 0.3, ChangeFrequency::Yearly),
];

fn entries_for(routes: &[StaticRoute], site: &Url, now: DateTime<Utc>) -> Vec<SitemapEntry> {
    routes
        .iter()
        .filter_map(|r| SitemapEntry::new(site, r.path, now, r.change_frequency, r.priority))
        .collect()
}

pub fn static_entries(site: &Url, now: DateTime<Utc>) -> Vec<SitemapEntry> {
    entries_for(STATIC_ROUTES, site, now)
}

pub fn minimal_fallback_entries(site: &Url, now: DateTime<Utc>) -> Vec<SitemapEntry> {
    entries_for(MINIMAL_FALLBACK_ROUTES, site, now)
}

/// Stable sort by descending priority; ties keep insertion order.
pub fn sort_by_priority(entries: &mut [SitemapEntry]) {
    entries.sort_by(|a, b| b.priority.total_cmp(&a.priority));
}
