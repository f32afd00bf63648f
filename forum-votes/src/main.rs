//! Forum Votes Main Entry Point
//!
//! Serves the vote ledger of the fitness platform forum over HTTP.

use dotenv::dotenv;
use forum_votes::{server, Dependencies, ServerError, Settings};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            "forum_votes=info,forum_votes_ledger=info,forum_votes_repository=info,tower_http=info",
        )
    });

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();
    }

    info!(
        service_name = "forum-votes",
        service_version = env!("CARGO_PKG_VERSION"),
        json,
        "Tracing initialized"
    );
}

/// Resolves on Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("Starting forum votes server");

    let settings = Settings::from_env().inspect_err(|e| {
        error!(error = %e, "Invalid configuration");
    })?;

    let dependencies = match Dependencies::new(&settings).await {
        Ok(dependencies) => {
            info!(backend = ?settings.store_backend, "Dependencies initialized successfully");
            dependencies
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let app = server::create_app(dependencies.app_state());
    let result = server::run_server(app, settings.socket_addr(), shutdown_signal()).await;

    dependencies.shutdown().await;

    match result {
        Ok(()) => {
            info!("Forum votes server stopped");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Server error");
            Err(e)
        }
    }
}
