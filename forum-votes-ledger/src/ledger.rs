//! This module defines the `VoteLedger`, which applies a voter's up/down intent to
//! a post's counters and per-voter state.
//!
//! A vote is a read-transition-write cycle. The write is conditional on the voter's
//! state still being the one that was read, so two interleaved cycles for the same
//! voter cannot both apply; the loser re-reads and tries again. Counters are written
//! as deltas, so cycles for different voters never overwrite each other.
use std::sync::Arc;

use forum_votes_repository::{PostsRepository, UpdateOutcome};
use forum_votes_shared::types::{
    compute_vote_delta, ForumPost, Polarity, PostId, VoteMutation, VoterKey, VotesCount,
};
use tokio_retry::strategy::{jitter, FixedInterval};
use tokio_retry::RetryIf;
use tracing::{debug, warn};

use crate::config::LedgerConfig;
use crate::errors::LedgerError;
use crate::store::with_timeout;

/// `VoteLedger` tracks, per forum post, the aggregate vote counters and each
/// voter's current vote, enforcing one active vote per (post, voter).
pub struct VoteLedger {
    repository: Arc<dyn PostsRepository>,
    config: LedgerConfig,
}

impl VoteLedger {
    /// Creates a new `VoteLedger` over the given store.
    ///
    /// # Arguments
    ///
    /// * `repository` - The posts store the ledger reads and conditionally updates
    /// * `config` - Timeout and retry bounds
    pub fn new(repository: Arc<dyn PostsRepository>, config: LedgerConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Normalizes a voter identity into the key used in a post's voter map.
    pub fn normalize(identity: &str) -> Result<VoterKey, LedgerError> {
        Ok(VoterKey::normalize(identity)?)
    }

    /// Casts `polarity` on `post_id` on behalf of `identity`.
    ///
    /// Repeating the voter's current polarity changes nothing; switching moves one
    /// unit from the old polarity's counter to the new one.
    ///
    /// # Arguments
    ///
    /// * `post_id` - The post being voted on
    /// * `identity` - The voter's raw identity (account email)
    /// * `polarity` - The requested vote
    ///
    /// # Returns
    ///
    /// The post's counters after the vote.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - malformed identity, raised before touching the store
    /// * `NotFound` - no such post; nothing is written
    /// * `Conflict` - every attempt lost to a concurrent update
    /// * `Timeout` - a store call exceeded the configured bound
    /// * `Repository` - any other store failure
    pub async fn cast_vote(
        &self,
        post_id: PostId,
        identity: &str,
        polarity: Polarity,
    ) -> Result<VotesCount, LedgerError> {
        let voter = Self::normalize(identity)?;

        let retries = self.config.max_attempts.saturating_sub(1);
        let strategy = FixedInterval::new(self.config.retry_delay)
            .map(jitter)
            .take(retries);

        let mut attempt = 0;
        RetryIf::spawn(
            strategy,
            || {
                attempt += 1;
                self.try_cast_vote(post_id, &voter, polarity, attempt)
            },
            |e: &LedgerError| matches!(e, LedgerError::Conflict(_)),
        )
        .await
    }

    /// Returns the post's current counters.
    pub async fn get_counts(&self, post_id: PostId) -> Result<VotesCount, LedgerError> {
        Ok(self.find_post(post_id).await?.counts())
    }

    /// Returns the voter's recorded vote on the post, `None` if they never voted.
    pub async fn get_vote(
        &self,
        post_id: PostId,
        identity: &str,
    ) -> Result<Option<Polarity>, LedgerError> {
        let voter = Self::normalize(identity)?;
        Ok(self.find_post(post_id).await?.vote_of(&voter))
    }

    async fn find_post(&self, post_id: PostId) -> Result<ForumPost, LedgerError> {
        with_timeout(self.config.store_timeout, self.repository.find_post(post_id))
            .await?
            .ok_or(LedgerError::NotFound(post_id))
    }

    /// One read-transition-write cycle.
    async fn try_cast_vote(
        &self,
        post_id: PostId,
        voter: &VoterKey,
        polarity: Polarity,
        attempt: usize,
    ) -> Result<VotesCount, LedgerError> {
        let post = self.find_post(post_id).await?;
        let saved = post.vote_of(voter);
        let delta = compute_vote_delta(saved, polarity);

        if delta.is_zero() {
            debug!(post_id = %post_id, polarity = %polarity, "Repeated vote, nothing to write");
            return Ok(post.counts());
        }

        let mutation = VoteMutation { delta, record: polarity };
        let outcome = with_timeout(
            self.config.store_timeout,
            self.repository.atomic_update(post_id, voter, saved, &mutation),
        )
        .await?;

        match outcome {
            UpdateOutcome::Updated(post) => {
                debug!(
                    post_id = %post_id,
                    polarity = %polarity,
                    attempt,
                    upvotes = post.upvotes,
                    downvotes = post.downvotes,
                    "Vote applied"
                );
                Ok(post.counts())
            }
            UpdateOutcome::Conflict => {
                warn!(post_id = %post_id, polarity = %polarity, attempt, "Vote lost to a concurrent update");
                Err(LedgerError::Conflict(post_id))
            }
            UpdateOutcome::NotFound => Err(LedgerError::NotFound(post_id)),
        }
    }
}
