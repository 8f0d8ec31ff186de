//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap a single upstream exchange with a hard deadline
//! - Cancel the exchange cleanly on timeout
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from network and HTTP errors
//! - The wrapped future is dropped on expiry; for reqwest this aborts the
//!   in-flight request and closes its connection
//! - No retries here; retry policy belongs to callers

use std::future::Future;
use std::time::Duration;

use crate::upstream::error::{FetchError, FetchResult};

/// Run `fut` to completion unless `deadline` elapses first.
pub async fn with_deadline<T, F>(deadline: Duration, fut: F) -> FetchResult<T>
where
    F: Future<Output = FetchResult<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(deadline)),
    }
}
