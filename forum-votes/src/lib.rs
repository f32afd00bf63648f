//! # Forum Votes
//!
//! HTTP service exposing the forum vote ledger of the fitness platform.
//!
//! ## Modules
//!
//! - [`config`]: Settings from the environment and dependency wiring
//! - [`server`]: Axum router, handlers and HTTP error mapping
//! - [`errors`]: Error types for startup and serving

pub mod config;
pub mod errors;
pub mod server;

pub use config::{Dependencies, Settings, StoreBackend};
pub use errors::ServerError;
