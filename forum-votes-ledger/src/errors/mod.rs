//! Error types for the vote ledger.
//! Defines the failures a vote can surface to its caller. None of them are swallowed:
//! every store result is propagated or turned into one of these variants.
use std::time::Duration;

use forum_votes_repository::PostsRepositoryError;
use forum_votes_shared::types::{InvalidIdentity, ParsePolarityError, PostId};
use thiserror::Error;

/// Represents errors that can occur within the vote ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The post does not exist. Not retried.
    #[error("Post not found: {0}")]
    NotFound(PostId),

    /// Concurrent writers kept invalidating the expected vote state until retries ran out.
    #[error("Too much contention on post {0}, retries exhausted")]
    Conflict(PostId),

    /// The store did not answer within the configured bound. Not retried.
    #[error("Store did not respond within {0:?}")]
    Timeout(Duration),

    /// Malformed voter identity or unrecognized polarity. Raised before any store access.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Repository error: {0}")]
    Repository(#[from] PostsRepositoryError),
}

impl LedgerError {
    /// Whether the caller may reasonably retry the same request later.
    pub fn is_retriable(&self) -> bool {
        matches!(self, LedgerError::Conflict(_) | LedgerError::Timeout(_))
    }
}

impl From<InvalidIdentity> for LedgerError {
    fn from(err: InvalidIdentity) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<ParsePolarityError> for LedgerError {
    fn from(err: ParsePolarityError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
