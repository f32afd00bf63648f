use std::sync::Arc;

use forum_votes_ledger::{PostsService, VoteLedger};
use forum_votes_repository::{InMemoryPostsRepository, PostgresPostsRepository, PostsRepository};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::config::{Settings, StoreBackend};
use crate::errors::ServerError;
use crate::server::state::AppState;

/// `Dependencies` holds the components the HTTP server needs.
///
/// It owns the PostgreSQL pool when one is used. The pool is opened once in
/// `new` and closed by `shutdown`; nothing else keeps a global connection.
pub struct Dependencies {
    pub ledger: Arc<VoteLedger>,
    pub posts: Arc<PostsService>,
    pool: Option<sqlx::PgPool>,
}

impl Dependencies {
    /// Creates a new `Dependencies` instance.
    ///
    /// Connects to the configured store, applies migrations when enabled, and wires
    /// the ledger and post service over the same repository.
    ///
    /// # Returns
    ///
    /// A `Result` which is `Ok(Self)` on successful initialization or a
    /// `ServerError` if the store cannot be reached or prepared.
    pub async fn new(settings: &Settings) -> Result<Self, ServerError> {
        let (repository, pool): (Arc<dyn PostsRepository>, Option<sqlx::PgPool>) =
            match settings.store_backend {
                StoreBackend::Memory => {
                    warn!("Using the in-memory store, posts and votes are lost on shutdown");
                    (Arc::new(InMemoryPostsRepository::new()), None)
                }
                StoreBackend::Postgres => {
                    let database_url = settings
                        .database_url
                        .as_deref()
                        .ok_or_else(|| ServerError::config("DATABASE_URL must be set"))?;

                    let pool = PgPoolOptions::new()
                        .max_connections(settings.database_max_connections)
                        .acquire_timeout(settings.ledger.store_timeout)
                        .connect(database_url)
                        .await?;

                    let repository = PostgresPostsRepository::new(pool.clone()).await?;
                    if settings.run_migrations {
                        repository.run_migrations().await?;
                        info!("Database migrations applied");
                    } else if !repository.check_tables_created().await? {
                        pool.close().await;
                        return Err(ServerError::config(
                            "forum_posts table is missing, set RUN_MIGRATIONS=true or migrate manually",
                        ));
                    }

                    (Arc::new(repository), Some(pool))
                }
            };

        let ledger = VoteLedger::new(repository.clone(), settings.ledger.clone());
        let posts = PostsService::new(repository, settings.ledger.store_timeout);

        Ok(Dependencies {
            ledger: Arc::new(ledger),
            posts: Arc::new(posts),
            pool,
        })
    }

    /// State shared with every request handler.
    pub fn app_state(&self) -> AppState {
        AppState {
            ledger: self.ledger.clone(),
            posts: self.posts.clone(),
        }
    }

    /// Releases the store connection. Waits for checked-out connections to return.
    pub async fn shutdown(self) {
        if let Some(pool) = self.pool {
            pool.close().await;
            info!("Database pool closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_settings() -> Settings {
        Settings::from_lookup(|key| match key {
            "STORE_BACKEND" => Some("memory".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_memory_dependencies() {
        let dependencies = Dependencies::new(&memory_settings()).await.unwrap();
        let state = dependencies.app_state();

        assert!(Arc::ptr_eq(&state.ledger, &dependencies.ledger));
        assert!(dependencies.posts.list_posts(None).await.unwrap().is_empty());

        dependencies.shutdown().await;
    }

    #[tokio::test]
    async fn test_dependencies_new_invalid_database_url() {
        let settings = Settings::from_lookup(|key| match key {
            "DATABASE_URL" => Some("invalid-database-url".to_string()),
            _ => None,
        })
        .unwrap();

        let result = Dependencies::new(&settings).await;
        assert!(result.is_err());

        if let Err(ServerError::Database(_)) = result {
            // Expected error type - test passes
        } else {
            panic!("Expected Database error");
        }
    }
}
