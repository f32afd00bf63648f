//! Error types for the forum votes repository.
//! Consolidates and re-exports error types related to posts repository operations.
mod posts;

pub use posts::PostsRepositoryError;
