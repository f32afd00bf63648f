//! In-process implementation of the posts repository.
//!
//! Used by the `memory` store backend and by tests. Each post sits behind its own
//! mutex, so a conditional update on one post never waits on another.
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use forum_votes_shared::types::{
    ForumPost, NewPost, Polarity, PostId, VoteMutation, VoterKey,
};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::{PostsRepository, PostsRepositoryError, UpdateOutcome};

#[derive(Default)]
pub struct InMemoryPostsRepository {
    posts: RwLock<HashMap<PostId, Arc<Mutex<ForumPost>>>>,
}

impl InMemoryPostsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, post_id: PostId) -> Option<Arc<Mutex<ForumPost>>> {
        self.posts.read().await.get(&post_id).cloned()
    }
}

#[async_trait]
impl PostsRepository for InMemoryPostsRepository {
    async fn find_post(&self, post_id: PostId) -> Result<Option<ForumPost>, PostsRepositoryError> {
        match self.slot(post_id).await {
            Some(slot) => Ok(Some(slot.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn atomic_update(
        &self,
        post_id: PostId,
        voter: &VoterKey,
        expected: Option<Polarity>,
        mutation: &VoteMutation,
    ) -> Result<UpdateOutcome, PostsRepositoryError> {
        let Some(slot) = self.slot(post_id).await else {
            return Ok(UpdateOutcome::NotFound);
        };

        let mut post = slot.lock().await;
        if post.vote_of(voter) != expected {
            return Ok(UpdateOutcome::Conflict);
        }
        post.apply_mutation(voter, mutation)
            .map_err(|underflow| PostsRepositoryError::CounterUnderflow {
                post_id,
                delta: underflow.delta,
            })?;

        Ok(UpdateOutcome::Updated(post.clone()))
    }

    async fn create_post(&self, new_post: NewPost) -> Result<ForumPost, PostsRepositoryError> {
        let post = ForumPost::new(Uuid::new_v4(), new_post, Utc::now());
        self.posts
            .write()
            .await
            .insert(post.id, Arc::new(Mutex::new(post.clone())));
        Ok(post)
    }

    async fn list_posts(&self, limit: u32) -> Result<Vec<ForumPost>, PostsRepositoryError> {
        let slots: Vec<_> = self.posts.read().await.values().cloned().collect();
        let mut posts = Vec::with_capacity(slots.len());
        for slot in slots {
            posts.push(slot.lock().await.clone());
        }
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        posts.truncate(limit as usize);
        Ok(posts)
    }

    async fn check_tables_created(&self) -> Result<bool, PostsRepositoryError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forum_votes_shared::types::{compute_vote_delta, VotesCount};

    fn new_post(title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            body: String::new(),
            author: "coach@fitpulse.io".to_string(),
        }
    }

    fn up_from_none() -> VoteMutation {
        VoteMutation {
            delta: compute_vote_delta(None, Polarity::Up),
            record: Polarity::Up,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_post() {
        let repository = InMemoryPostsRepository::new();
        let post = repository.create_post(new_post("Morning cardio")).await.unwrap();

        let found = repository.find_post(post.id).await.unwrap();
        assert_eq!(found, Some(post));
        assert_eq!(repository.find_post(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_atomic_update_applies_when_expectation_holds() {
        let repository = InMemoryPostsRepository::new();
        let post = repository.create_post(new_post("Protein timing")).await.unwrap();
        let voter = VoterKey::normalize("a@x.com").unwrap();

        let outcome = repository
            .atomic_update(post.id, &voter, None, &up_from_none())
            .await
            .unwrap();

        let updated = match outcome {
            UpdateOutcome::Updated(post) => post,
            other => panic!("Expected update, got {other:?}"),
        };
        assert_eq!(updated.counts(), VotesCount { upvotes: 1, downvotes: 0 });
        assert_eq!(updated.vote_of(&voter), Some(Polarity::Up));
    }

    #[tokio::test]
    async fn test_atomic_update_conflicts_on_stale_expectation() {
        let repository = InMemoryPostsRepository::new();
        let post = repository.create_post(new_post("Rest days")).await.unwrap();
        let voter = VoterKey::normalize("a@x.com").unwrap();

        repository.atomic_update(post.id, &voter, None, &up_from_none()).await.unwrap();
        let outcome = repository
            .atomic_update(post.id, &voter, None, &up_from_none())
            .await
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::Conflict);
        let stored = repository.find_post(post.id).await.unwrap().unwrap();
        assert_eq!(stored.counts(), VotesCount { upvotes: 1, downvotes: 0 });
    }

    #[tokio::test]
    async fn test_atomic_update_unknown_post_creates_nothing() {
        let repository = InMemoryPostsRepository::new();
        let voter = VoterKey::normalize("a@x.com").unwrap();
        let missing = Uuid::new_v4();

        let outcome = repository
            .atomic_update(missing, &voter, None, &up_from_none())
            .await
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::NotFound);
        assert_eq!(repository.find_post(missing).await.unwrap(), None);
        assert!(repository.list_posts(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_atomic_update_rejects_underflow() {
        let repository = InMemoryPostsRepository::new();
        let post = repository.create_post(new_post("Grip strength")).await.unwrap();
        let voter = VoterKey::normalize("a@x.com").unwrap();
        let mutation = VoteMutation {
            delta: compute_vote_delta(Some(Polarity::Up), Polarity::Down),
            record: Polarity::Down,
        };

        // The expectation matches (absent), but the delta would take upvotes below zero.
        let result = repository.atomic_update(post.id, &voter, None, &mutation).await;
        assert!(matches!(result, Err(PostsRepositoryError::CounterUnderflow { .. })));
    }

    #[tokio::test]
    async fn test_list_posts_newest_first_with_limit() {
        let repository = InMemoryPostsRepository::new();
        let first = repository.create_post(new_post("first")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = repository.create_post(new_post("second")).await.unwrap();

        let posts = repository.list_posts(10).await.unwrap();
        assert_eq!(posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![second.id, first.id]);
        assert_eq!(repository.list_posts(1).await.unwrap().len(), 1);
    }
}
