//! Error types for the forum votes service.
//! Covers everything that can stop the process: bad configuration, an unreachable
//! database, a failed migration or a listener that cannot bind.
use forum_votes_repository::PostsRepositoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Repository error: {0}")]
    Repository(#[from] PostsRepositoryError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
