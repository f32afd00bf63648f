use std::future::Future;
use std::time::Duration;

use forum_votes_repository::PostsRepositoryError;

use crate::errors::LedgerError;

/// Runs one store call under `limit`, mapping expiry to `LedgerError::Timeout`.
pub(crate) async fn with_timeout<T, F>(limit: Duration, operation: F) -> Result<T, LedgerError>
where
    F: Future<Output = Result<T, PostsRepositoryError>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result.map_err(LedgerError::from),
        Err(_) => Err(LedgerError::Timeout(limit)),
    }
}
