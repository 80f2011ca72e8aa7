//! BURSAR Core — domain models, repository traits, error taxonomy,
//! and the role-based permission gate.

pub mod access;
pub mod error;
pub mod models;
pub mod repository;

pub use access::{Action, authorize, authorize_self};
pub use error::{BursarError, BursarResult};
