//! # Forum Votes Ledger
//! This crate applies up/down votes to forum posts. It reads the voter's recorded
//! state, computes the transition and writes it back through a single conditional
//! update, retrying a bounded number of times when another writer got there first.
//! It also hosts the post operations the HTTP layer exposes next to voting.
pub mod config;
pub mod errors;
pub mod ledger;
pub mod posts;
mod store;

pub use config::LedgerConfig;
pub use errors::LedgerError;
pub use ledger::VoteLedger;
pub use posts::{PostsService, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
