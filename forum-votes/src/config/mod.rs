//! Configuration module for the forum votes service.
//! Defines and manages application-wide settings and dependencies.
mod cors;
mod dependencies;
mod settings;

pub use cors::create_cors_layer;
pub use dependencies::Dependencies;
pub use settings::{Settings, StoreBackend};
