// Request and response payloads
use forum_votes_shared::types::Polarity;
use serde::{Deserialize, Serialize};

/// Body of `POST /vote/{postId}/{polarity}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub voter_identity: String,
}

/// Body of `GET /posts/{postId}/votes/{voterIdentity}`
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoterVoteResponse {
    pub vote: Option<Polarity>,
}

/// Body of `POST /posts`
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub author: String,
}

/// Query of `GET /posts`
#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub limit: Option<u32>,
}
