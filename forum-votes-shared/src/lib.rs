//! # Forum Votes Shared
//! This crate defines shared data structures and types used across the forum votes crates.
//! It includes common definitions for forum posts, polarities, voter keys, vote counts
//! and the vote transition arithmetic.
pub mod types;
