// Server module - HTTP server setup and routing
pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

use std::future::Future;
use std::net::SocketAddr;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::create_cors_layer;
use crate::errors::ServerError;
use self::state::AppState;

/// Create the Axum application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/vote/:post_id", get(handlers::get_counts))
        .route("/vote/:post_id/:polarity", post(handlers::cast_vote))
        .route("/posts", get(handlers::list_posts).post(handlers::create_post))
        .route("/posts/:post_id", get(handlers::get_post))
        .route(
            "/posts/:post_id/votes/:voter_identity",
            get(handlers::get_voter_vote),
        )
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(state)
}

/// Run the server on the specified address until `shutdown` resolves.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn run_server<F>(app: Router, addr: SocketAddr, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);
    info!("- Vote endpoint: http://{}/vote/{{postId}}/{{up|down}}", addr);
    info!("- Posts endpoint: http://{}/posts", addr);
    info!("- Health endpoint: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server stopped");
    Ok(())
}
