//! This module defines the `PostsRepository` trait, which provides an interface
//! to the document store holding forum posts and their per-voter vote state.
use forum_votes_shared::types::{ForumPost, NewPost, Polarity, PostId, VoteMutation, VoterKey};

use crate::errors::PostsRepositoryError;

/// Result of a conditional update on a single post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The precondition held and the mutation was applied; carries the post after the update.
    Updated(ForumPost),
    /// The voter's recorded state no longer matched the expected one; nothing was written.
    Conflict,
    /// No post exists with the given id; nothing was written.
    NotFound,
}

/// A trait that defines the interface for interacting with the posts store.
///
/// Implementors must make `atomic_update` a single compare-and-update: the
/// precondition check and the write are indivisible with respect to other
/// updates of the same post.
#[async_trait::async_trait]
pub trait PostsRepository: Send + Sync {
    /// Fetches a post by id.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when no post has this id.
    async fn find_post(&self, post_id: PostId) -> Result<Option<ForumPost>, PostsRepositoryError>;

    /// Applies `mutation` to the post only if `voter`'s recorded state equals `expected`.
    ///
    /// The counter delta is added to the stored counters (not written as absolute
    /// values), so updates on behalf of different voters never overwrite each other.
    ///
    /// # Arguments
    ///
    /// * `post_id` - The post to update
    /// * `voter` - The normalized voter whose entry is checked and replaced
    /// * `expected` - The state the caller read for `voter`, `None` if absent
    /// * `mutation` - Counter delta and the new state to record
    ///
    /// # Returns
    ///
    /// An `UpdateOutcome` describing whether the update was applied.
    async fn atomic_update(
        &self,
        post_id: PostId,
        voter: &VoterKey,
        expected: Option<Polarity>,
        mutation: &VoteMutation,
    ) -> Result<UpdateOutcome, PostsRepositoryError>;

    /// Saves a new post with zeroed counters and an empty voter map.
    async fn create_post(&self, new_post: NewPost) -> Result<ForumPost, PostsRepositoryError>;

    /// Lists the most recently created posts, newest first.
    async fn list_posts(&self, limit: u32) -> Result<Vec<ForumPost>, PostsRepositoryError>;

    /// Checks whether the backing tables exist.
    async fn check_tables_created(&self) -> Result<bool, PostsRepositoryError>;
}
