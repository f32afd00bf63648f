//! This module defines and re-exports the interfaces for the posts repository.
mod posts;

pub use posts::{PostsRepository, UpdateOutcome};
