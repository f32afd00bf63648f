// HTTP request handlers
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use forum_votes_shared::types::{ForumPost, NewPost, Polarity, PostId, VotesCount};
use tracing::info;

use crate::server::error::ApiError;
use crate::server::models::{CreatePostRequest, ListPostsQuery, VoteRequest, VoterVoteResponse};
use crate::server::state::AppState;

/// Root endpoint
pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, "forum votes server is running")
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// A path segment that is not a UUID names no post.
fn parse_post_id(raw: &str) -> Result<PostId, ApiError> {
    raw.parse::<PostId>()
        .map_err(|_| ApiError::UnknownPost(raw.to_string()))
}

/// `POST /vote/{postId}/{polarity}` - casts an up or down vote
pub async fn cast_vote(
    State(state): State<AppState>,
    Path((post_id, polarity)): Path<(String, String)>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Json<VotesCount>, ApiError> {
    let polarity = polarity
        .parse::<Polarity>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let post_id = parse_post_id(&post_id)?;
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let counts = state
        .ledger
        .cast_vote(post_id, &payload.voter_identity, polarity)
        .await?;

    info!(
        %post_id,
        %polarity,
        upvotes = counts.upvotes,
        downvotes = counts.downvotes,
        "Vote cast"
    );
    Ok(Json(counts))
}

/// `GET /vote/{postId}` - current counters of a post
pub async fn get_counts(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<VotesCount>, ApiError> {
    let post_id = parse_post_id(&post_id)?;
    Ok(Json(state.ledger.get_counts(post_id).await?))
}

/// `GET /posts/{postId}/votes/{voterIdentity}` - the voter's recorded vote
pub async fn get_voter_vote(
    State(state): State<AppState>,
    Path((post_id, voter_identity)): Path<(String, String)>,
) -> Result<Json<VoterVoteResponse>, ApiError> {
    let post_id = parse_post_id(&post_id)?;
    let vote = state.ledger.get_vote(post_id, &voter_identity).await?;
    Ok(Json(VoterVoteResponse { vote }))
}

/// `POST /posts` - saves a new post with zeroed counters
pub async fn create_post(
    State(state): State<AppState>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ForumPost>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let post = state
        .posts
        .create_post(NewPost {
            title: payload.title,
            body: payload.body,
            author: payload.author,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// `GET /posts?limit=` - newest posts first
pub async fn list_posts(
    State(state): State<AppState>,
    query: Result<Query<ListPostsQuery>, QueryRejection>,
) -> Result<Json<Vec<ForumPost>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(Json(state.posts.list_posts(query.limit).await?))
}

/// `GET /posts/{postId}`
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<ForumPost>, ApiError> {
    let post_id = parse_post_id(&post_id)?;
    Ok(Json(state.posts.get_post(post_id).await?))
}
