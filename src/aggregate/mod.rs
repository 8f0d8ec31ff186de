//! Aggregation subsystem.
//!
//! # Data Flow
//! ```text
//! Page loader / sitemap builder
//!     → scheduler.rs (fan out N requests, wait for all to settle)
//!     → upstream (one guarded exchange per request)
//!     → resolve_with_fallback (normalize, or substitute the field default)
//!     → record with exactly one value per requested field
//! ```

pub mod scheduler;

pub use scheduler::{resolve_optional, resolve_with_fallback, Aggregator, FieldRequest, Settled, Shape};
