//! Post operations exposed next to voting: save, fetch and list.
use std::sync::Arc;
use std::time::Duration;

use forum_votes_repository::PostsRepository;
use forum_votes_shared::types::{ForumPost, NewPost, PostId};
use tracing::info;

use crate::errors::LedgerError;
use crate::store::with_timeout;

pub const DEFAULT_LIST_LIMIT: u32 = 20;
pub const MAX_LIST_LIMIT: u32 = 100;

pub struct PostsService {
    repository: Arc<dyn PostsRepository>,
    store_timeout: Duration,
}

impl PostsService {
    pub fn new(repository: Arc<dyn PostsRepository>, store_timeout: Duration) -> Self {
        Self {
            repository,
            store_timeout,
        }
    }

    /// Saves a new post with zeroed counters. The title must not be blank.
    pub async fn create_post(&self, new_post: NewPost) -> Result<ForumPost, LedgerError> {
        let new_post = NewPost {
            title: new_post.title.trim().to_string(),
            ..new_post
        };
        if new_post.title.is_empty() {
            return Err(LedgerError::InvalidInput("Post title must not be empty".to_string()));
        }

        let post = with_timeout(self.store_timeout, self.repository.create_post(new_post)).await?;
        info!(post_id = %post.id, "Post created");
        Ok(post)
    }

    pub async fn get_post(&self, post_id: PostId) -> Result<ForumPost, LedgerError> {
        with_timeout(self.store_timeout, self.repository.find_post(post_id))
            .await?
            .ok_or(LedgerError::NotFound(post_id))
    }

    /// Lists the newest posts. `limit` defaults to 20 and is clamped to 1..=100.
    pub async fn list_posts(&self, limit: Option<u32>) -> Result<Vec<ForumPost>, LedgerError> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
        with_timeout(self.store_timeout, self.repository.list_posts(limit)).await
    }
}
