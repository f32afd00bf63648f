use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{CounterUnderflow, Polarity, VoteMutation, VoterKey, VotesCount};

pub type PostId = Uuid;

/// Represents a forum post together with its voting state.
///
/// `voted_users` holds one entry per voter who has cast at least one vote on the
/// post; its value names the counter currently holding that voter's unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ForumPost {
    pub id: PostId,
    pub title: String,
    pub body: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub upvotes: i64,
    pub downvotes: i64,
    #[serde(rename = "votedUser")]
    pub voted_users: BTreeMap<VoterKey, Polarity>,
}

/// The fields supplied when saving a new post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub author: String,
}

impl ForumPost {
    /// Builds a freshly saved post with zeroed counters and no voters.
    pub fn new(id: PostId, new_post: NewPost, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new_post.title,
            body: new_post.body,
            author: new_post.author,
            created_at,
            upvotes: 0,
            downvotes: 0,
            voted_users: BTreeMap::new(),
        }
    }

    pub fn counts(&self) -> VotesCount {
        VotesCount {
            upvotes: self.upvotes,
            downvotes: self.downvotes,
        }
    }

    /// The voter's recorded state on this post, `None` if they never voted.
    pub fn vote_of(&self, voter: &VoterKey) -> Option<Polarity> {
        self.voted_users.get(voter).copied()
    }

    /// Applies a mutation for `voter`, leaving the post untouched on underflow.
    pub fn apply_mutation(
        &mut self,
        voter: &VoterKey,
        mutation: &VoteMutation,
    ) -> Result<(), CounterUnderflow> {
        let counts = self.counts().checked_apply(mutation.delta)?;
        self.upvotes = counts.upvotes;
        self.downvotes = counts.downvotes;
        self.voted_users.insert(voter.clone(), mutation.record);
        Ok(())
    }
}
