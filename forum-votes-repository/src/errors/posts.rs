//! Error types for the posts repository.
//! Defines specific errors that can occur during store operations on forum posts.
use forum_votes_shared::types::{PostId, VotesDelta};
use thiserror::Error;

/// Represents errors that can occur within the posts repository.
///
/// Conflicts and missing posts are not errors here; they are reported through
/// `UpdateOutcome` so the caller can decide whether to retry.
#[derive(Debug, Error)]
pub enum PostsRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid vote state stored for post {post_id}: {value}")]
    InvalidVoteState { post_id: PostId, value: String },

    #[error("Applying {delta:?} to post {post_id} would make a counter negative")]
    CounterUnderflow { post_id: PostId, delta: VotesDelta },
}
