//! Retry with exponential backoff for transient catalog API failures.
//!
//! This is the only retry layer in the system. Callers above the client see a
//! single success or a single final error.

use std::future::Future;
use std::time::Duration;

use crate::error::CatalogError;

/// Returns `true` if `err` is transient and worth another attempt.
///
/// Retriable: [`CatalogError::RateLimited`] (429), [`CatalogError::Http`]
/// (connection reset, timeout) and 5xx [`CatalogError::UnexpectedStatus`].
/// Everything else, including auth failures and malformed bodies, is returned
/// immediately.
fn is_retriable(err: &CatalogError) -> bool {
    match err {
        CatalogError::RateLimited { .. } | CatalogError::Http(_) => true,
        CatalogError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Executes `operation`, retrying transient errors up to `max_retries`
/// additional times. The wait before retry `n` (1-based) is
/// `backoff_base_secs * 2^(n-1)` seconds.
///
/// With `max_retries = 3` the operation is attempted at most 4 times total;
/// `max_retries = 0` disables retrying.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, CatalogError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CatalogError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient catalog error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
