use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::VotesDelta;

/// Represents the aggregated vote counts of a forum post.
///
/// This struct stores the total number of upvotes and downvotes for a post and
/// is what a vote returns to the caller.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VotesCount {
    pub upvotes: i64,
    pub downvotes: i64,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Applying delta {delta:?} to {count:?} would make a counter negative")]
pub struct CounterUnderflow {
    pub count: VotesCount,
    pub delta: VotesDelta,
}

impl VotesCount {
    /// Sum of both counters, one unit per voter holding a vote on the post.
    pub fn total(&self) -> i64 {
        self.upvotes + self.downvotes
    }

    /// Applies a delta, refusing any result with a negative counter.
    pub fn checked_apply(&self, delta: VotesDelta) -> Result<VotesCount, CounterUnderflow> {
        let upvotes = self.upvotes + delta.upvotes;
        let downvotes = self.downvotes + delta.downvotes;
        if upvotes < 0 || downvotes < 0 {
            return Err(CounterUnderflow { count: *self, delta });
        }
        Ok(VotesCount { upvotes, downvotes })
    }
}
