// App state for Axum server
use std::sync::Arc;

use forum_votes_ledger::{PostsService, VoteLedger};

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<VoteLedger>,
    pub posts: Arc<PostsService>,
}
