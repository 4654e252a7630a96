//! Bounded retry of version-guarded writes.

use super::{BoardServiceError, BoardServiceResult};
use std::future::Future;

/// Runs `attempt` until it succeeds, fails with a non-conflict error, or the
/// attempt budget is spent.
///
/// Each attempt must re-read the state it writes; a conflict means another
/// writer committed first.
pub(crate) async fn with_write_retry<T, F, Fut>(
    operation: &'static str,
    max_attempts: u32,
    mut attempt: F,
) -> BoardServiceResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = BoardServiceResult<T>>,
{
    let mut tried: u32 = 1;
    loop {
        match attempt().await {
            Err(err) if err.is_retryable() && tried < max_attempts => {
                tracing::debug!(operation, attempt = tried, error = %err, "write conflict, retrying");
                tried = tried.saturating_add(1);
            }
            Err(err) => {
                if err.is_retryable() {
                    warn_exhausted(operation, tried, &err);
                }
                return Err(err);
            }
            Ok(value) => return Ok(value),
        }
    }
}

fn warn_exhausted(operation: &'static str, attempts: u32, err: &BoardServiceError) {
    tracing::warn!(operation, attempts, error = %err, "write conflict persisted, giving up");
}
