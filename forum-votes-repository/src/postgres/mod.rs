//! PostgreSQL backend for the posts repository.
mod posts_repository;

pub use posts_repository::PostgresPostsRepository;
