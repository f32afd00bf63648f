//! PostgreSQL implementation of the posts repository.
//!
//! Posts live in a single `forum_posts` table. The per-voter state is a JSONB object
//! keyed by `VoterKey`, so a vote touches exactly one row and the precondition
//! check, the counter arithmetic and the voter entry are written by one statement.
//!
//! ## Database Tables
//!
//! - `forum_posts`: post fields, `upvotes`/`downvotes` counters (with non-negative
//!   `CHECK` constraints) and the `voted_users` JSONB map
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use forum_votes_shared::types::{
    ForumPost, NewPost, Polarity, PostId, VoteMutation, VoterKey,
};
use sqlx::types::Json;
use tracing::debug;
use uuid::Uuid;

use crate::{PostsRepository, PostsRepositoryError, UpdateOutcome};

/// SQLSTATE raised when a `CHECK` constraint rejects a row.
const CHECK_VIOLATION: &str = "23514";

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    body: String,
    author: String,
    created_at: DateTime<Utc>,
    upvotes: i64,
    downvotes: i64,
    voted_users: Json<BTreeMap<String, String>>,
}

impl TryFrom<PostRow> for ForumPost {
    type Error = PostsRepositoryError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        let PostRow {
            id,
            title,
            body,
            author,
            created_at,
            upvotes,
            downvotes,
            voted_users,
        } = row;

        let mut votes = BTreeMap::new();
        for (key, value) in voted_users.0 {
            let polarity = match value.parse::<Polarity>() {
                Ok(polarity) => polarity,
                Err(_) => return Err(PostsRepositoryError::InvalidVoteState { post_id: id, value }),
            };
            votes.insert(VoterKey::from_stored(key), polarity);
        }

        Ok(ForumPost {
            id,
            title,
            body,
            author,
            created_at,
            upvotes,
            downvotes,
            voted_users: votes,
        })
    }
}

/// PostgreSQL-backed posts repository.
///
/// Owns a clone of the connection pool handed to it at startup; the pool itself is
/// closed by whoever created it.
pub struct PostgresPostsRepository {
    pool: sqlx::PgPool,
}

impl PostgresPostsRepository {
    /// Creates a new PostgreSQL repository instance.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool
    ///
    /// # Returns
    ///
    /// * `Ok(PostgresPostsRepository)` - Ready-to-use repository instance
    /// * `Err(PostsRepositoryError)` - Future validation errors (currently always succeeds)
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, PostsRepositoryError> {
        Ok(Self { pool })
    }

    /// Applies the embedded schema migrations.
    pub async fn run_migrations(&self) -> Result<(), PostsRepositoryError> {
        sqlx::migrate!("src/postgres/migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn post_exists(&self, post_id: PostId) -> Result<bool, PostsRepositoryError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM forum_posts WHERE id = $1)")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

#[async_trait]
impl PostsRepository for PostgresPostsRepository {
    async fn find_post(&self, post_id: PostId) -> Result<Option<ForumPost>, PostsRepositoryError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, body, author, created_at, upvotes, downvotes, voted_users
            FROM forum_posts
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ForumPost::try_from).transpose()
    }

    /// Compare-and-update on one row.
    ///
    /// The `WHERE` clause carries the precondition on the voter's JSONB entry. Under
    /// PostgreSQL's row locking a concurrent writer that commits first makes the
    /// predicate re-evaluate against the new row version, so a stale expectation
    /// matches zero rows instead of overwriting. Counters are incremented in place.
    async fn atomic_update(
        &self,
        post_id: PostId,
        voter: &VoterKey,
        expected: Option<Polarity>,
        mutation: &VoteMutation,
    ) -> Result<UpdateOutcome, PostsRepositoryError> {
        let result = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE forum_posts
            SET upvotes = upvotes + $3,
                downvotes = downvotes + $4,
                voted_users = voted_users || jsonb_build_object($2::text, $5::text)
            WHERE id = $1
              AND (voted_users ->> $2::text) IS NOT DISTINCT FROM $6::text
            RETURNING id, title, body, author, created_at, upvotes, downvotes, voted_users
            "#,
        )
        .bind(post_id)
        .bind(voter.as_str())
        .bind(mutation.delta.upvotes)
        .bind(mutation.delta.downvotes)
        .bind(mutation.record.as_str())
        .bind(expected.map(|polarity| polarity.as_str()))
        .fetch_optional(&self.pool)
        .await;

        let row = match result {
            Ok(row) => row,
            Err(sqlx::Error::Database(db_error)) if db_error.code().as_deref() == Some(CHECK_VIOLATION) => {
                return Err(PostsRepositoryError::CounterUnderflow {
                    post_id,
                    delta: mutation.delta,
                });
            }
            Err(e) => return Err(e.into()),
        };

        match row {
            Some(row) => Ok(UpdateOutcome::Updated(row.try_into()?)),
            None if self.post_exists(post_id).await? => {
                debug!(post_id = %post_id, voter = %voter, "Vote precondition no longer holds");
                Ok(UpdateOutcome::Conflict)
            }
            None => Ok(UpdateOutcome::NotFound),
        }
    }

    async fn create_post(&self, new_post: NewPost) -> Result<ForumPost, PostsRepositoryError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO forum_posts (id, title, body, author, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, body, author, created_at, upvotes, downvotes, voted_users
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_post.title)
        .bind(&new_post.body)
        .bind(&new_post.author)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list_posts(&self, limit: u32) -> Result<Vec<ForumPost>, PostsRepositoryError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, body, author, created_at, upvotes, downvotes, voted_users
            FROM forum_posts
            ORDER BY created_at DESC, id
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ForumPost::try_from).collect()
    }

    async fn check_tables_created(&self) -> Result<bool, PostsRepositoryError> {
        let table_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM information_schema.tables WHERE table_name = $1)",
        )
        .bind("forum_posts")
        .fetch_one(&self.pool)
        .await?;
        Ok(table_exists)
    }
}
