//! # Forum Votes Repository
//! This crate provides traits and implementations for interacting with the
//! document store holding forum posts. It includes definitions for errors, interfaces,
//! and concrete implementations for PostgreSQL and for an in-process memory store.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::PostsRepositoryError;
pub use interfaces::{PostsRepository, UpdateOutcome};
pub use memory::InMemoryPostsRepository;
pub use postgres::PostgresPostsRepository;
