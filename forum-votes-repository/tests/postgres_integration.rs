//! Integration tests for the PostgreSQL posts repository implementation.
//!
//! These tests require a real PostgreSQL database and use SQLx test macros
//! to ensure proper test isolation and cleanup. They are ignored by default.
//!
//! Run with: `DATABASE_URL=... cargo test --test postgres_integration -- --ignored`

use forum_votes_repository::{PostgresPostsRepository, PostsRepository, PostsRepositoryError, UpdateOutcome};
use forum_votes_shared::types::{compute_vote_delta, NewPost, Polarity, VoteMutation, VoterKey, VotesCount};
use sqlx::Row;
use uuid::Uuid;

/// Creates a test post payload with default values.
fn make_new_post() -> NewPost {
    NewPost {
        title: "Deadlift form check".to_string(),
        body: "Hips or back first?".to_string(),
        author: "coach@fitpulse.io".to_string(),
    }
}

fn mutation(saved: Option<Polarity>, requested: Polarity) -> VoteMutation {
    VoteMutation {
        delta: compute_vote_delta(saved, requested),
        record: requested,
    }
}

// ============================================================================
// Posts Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_create_post(pool: sqlx::PgPool) {
    let repository = PostgresPostsRepository::new(pool.clone()).await.unwrap();

    let post = repository.create_post(make_new_post()).await.unwrap();

    assert_eq!(post.counts(), VotesCount::default());
    assert!(post.voted_users.is_empty());

    let rows = sqlx::query("SELECT * FROM forum_posts").fetch_all(&pool).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get::<Uuid, _>("id"), post.id);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_find_missing_post(pool: sqlx::PgPool) {
    let repository = PostgresPostsRepository::new(pool).await.unwrap();
    assert_eq!(repository.find_post(Uuid::new_v4()).await.unwrap(), None);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_check_tables_created(pool: sqlx::PgPool) {
    let repository = PostgresPostsRepository::new(pool).await.unwrap();
    assert!(repository.check_tables_created().await.unwrap());
}

// ============================================================================
// Atomic Update Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_atomic_update_records_vote(pool: sqlx::PgPool) {
    let repository = PostgresPostsRepository::new(pool).await.unwrap();
    let post = repository.create_post(make_new_post()).await.unwrap();
    let voter = VoterKey::normalize("a@x.com").unwrap();

    let outcome = repository
        .atomic_update(post.id, &voter, None, &mutation(None, Polarity::Up))
        .await
        .unwrap();

    let updated = match outcome {
        UpdateOutcome::Updated(post) => post,
        other => panic!("Expected update, got {other:?}"),
    };
    assert_eq!(updated.counts(), VotesCount { upvotes: 1, downvotes: 0 });
    assert_eq!(updated.vote_of(&voter), Some(Polarity::Up));

    let stored = repository.find_post(post.id).await.unwrap().unwrap();
    assert_eq!(stored, updated);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_atomic_update_switch(pool: sqlx::PgPool) {
    let repository = PostgresPostsRepository::new(pool).await.unwrap();
    let post = repository.create_post(make_new_post()).await.unwrap();
    let voter = VoterKey::normalize("a@x.com").unwrap();

    repository
        .atomic_update(post.id, &voter, None, &mutation(None, Polarity::Up))
        .await
        .unwrap();
    repository
        .atomic_update(post.id, &voter, Some(Polarity::Up), &mutation(Some(Polarity::Up), Polarity::Down))
        .await
        .unwrap();

    let stored = repository.find_post(post.id).await.unwrap().unwrap();
    assert_eq!(stored.counts(), VotesCount { upvotes: 0, downvotes: 1 });
    assert_eq!(stored.vote_of(&voter), Some(Polarity::Down));
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_atomic_update_stale_expectation_conflicts(pool: sqlx::PgPool) {
    let repository = PostgresPostsRepository::new(pool).await.unwrap();
    let post = repository.create_post(make_new_post()).await.unwrap();
    let voter = VoterKey::normalize("a@x.com").unwrap();

    repository
        .atomic_update(post.id, &voter, None, &mutation(None, Polarity::Up))
        .await
        .unwrap();
    let outcome = repository
        .atomic_update(post.id, &voter, None, &mutation(None, Polarity::Up))
        .await
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::Conflict);
    let stored = repository.find_post(post.id).await.unwrap().unwrap();
    assert_eq!(stored.counts(), VotesCount { upvotes: 1, downvotes: 0 });
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_atomic_update_missing_post(pool: sqlx::PgPool) {
    let repository = PostgresPostsRepository::new(pool.clone()).await.unwrap();
    let voter = VoterKey::normalize("a@x.com").unwrap();

    let outcome = repository
        .atomic_update(Uuid::new_v4(), &voter, None, &mutation(None, Polarity::Down))
        .await
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::NotFound);
    let rows = sqlx::query("SELECT * FROM forum_posts").fetch_all(&pool).await.unwrap();
    assert!(rows.is_empty());
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_atomic_update_underflow_is_rejected(pool: sqlx::PgPool) {
    let repository = PostgresPostsRepository::new(pool).await.unwrap();
    let post = repository.create_post(make_new_post()).await.unwrap();
    let voter = VoterKey::normalize("a@x.com").unwrap();

    let result = repository
        .atomic_update(post.id, &voter, None, &mutation(Some(Polarity::Up), Polarity::Down))
        .await;

    assert!(matches!(result, Err(PostsRepositoryError::CounterUnderflow { .. })));
    let stored = repository.find_post(post.id).await.unwrap().unwrap();
    assert_eq!(stored.counts(), VotesCount::default());
    assert!(stored.voted_users.is_empty());
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_concurrent_voters_do_not_lose_updates(pool: sqlx::PgPool) {
    let repository = std::sync::Arc::new(PostgresPostsRepository::new(pool).await.unwrap());
    let post = repository.create_post(make_new_post()).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..16 {
        let repository = repository.clone();
        handles.push(tokio::spawn(async move {
            let voter = VoterKey::normalize(&format!("voter{i}@x.com")).unwrap();
            let requested = if i % 2 == 0 { Polarity::Up } else { Polarity::Down };
            repository
                .atomic_update(post.id, &voter, None, &mutation(None, requested))
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        assert!(matches!(handle.await.unwrap(), UpdateOutcome::Updated(_)));
    }

    let stored = repository.find_post(post.id).await.unwrap().unwrap();
    assert_eq!(stored.counts(), VotesCount { upvotes: 8, downvotes: 8 });
    assert_eq!(stored.voted_users.len(), 16);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_invalid_stored_vote_state(pool: sqlx::PgPool) {
    let repository = PostgresPostsRepository::new(pool.clone()).await.unwrap();
    let post = repository.create_post(make_new_post()).await.unwrap();

    sqlx::query("UPDATE forum_posts SET voted_users = '{\"a@x%2Ecom\": \"sideways\"}'::jsonb WHERE id = $1")
        .bind(post.id)
        .execute(&pool)
        .await
        .unwrap();

    let result = repository.find_post(post.id).await;
    assert!(matches!(result, Err(PostsRepositoryError::InvalidVoteState { .. })));
}
