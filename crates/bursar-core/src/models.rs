//! Domain models for BURSAR.
//!
//! These are the core types shared across all crates.

pub mod group;
pub mod operation;
pub mod semester;
pub mod transaction;
pub mod user;
