//! Upstream content API subsystem.
//!
//! # Data Flow
//! ```text
//! UpstreamRequest (path, cache directive, deadline)
//!     → client.rs (build GET against base URL)
//!     → timeout.rs (race exchange against deadline, cancel on expiry)
//!     → error.rs (classify: Timeout / Network / Http / MalformedResponse)
//!     → Result<serde_json::Value, FetchError>
//! ```
//!
//! # Design Decisions
//! - Every upstream call has a deadline
//! - No retries, no circuit breaking
//! - Consumers depend on the `Upstream` trait, not on reqwest

pub mod client;
pub mod error;
pub mod request;
pub mod timeout;

#[cfg(test)]
pub mod mock;

use futures_util::future::BoxFuture;
use serde_json::Value;

pub use client::{ClientError, UpstreamClient};
pub use error::{FetchError, FetchResult};
pub use request::{CacheDirective, UpstreamRequest};

/// Anything that can answer an [`UpstreamRequest`] with a parsed JSON body.
pub trait Upstream: Send + Sync {
    fn fetch<'a>(&'a self, request: &'a UpstreamRequest) -> BoxFuture<'a, FetchResult<Value>>;
}
