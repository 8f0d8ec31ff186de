//! Sitemap subsystem.
//!
//! # Data Flow
//! ```text
//! GET /sitemap.xml
//!     → builder.rs (static entries + bounded course/blog aggregation)
//!     → entry.rs (absolute URLs, clamped priorities, stable sort)
//!     → xml.rs (sitemaps.org urlset)
//! ```
//!
//! # Design Decisions
//! - The endpoint never errors; worst case is the minimal static list
//! - Budgets are configuration, not constants

pub mod builder;
pub mod entry;
pub mod xml;

pub use builder::{SitemapBudgets, SitemapBuilder};
pub use entry::{minimal_fallback_entries, static_entries, ChangeFrequency, SitemapEntry};
pub use xml::render_xml;
