//! SurrealDB repository implementations.
//!
//! Shared conventions across the repositories: records are addressed
//! as `type::record('table', $id)` with UUID strings for ids, and
//! list queries project `meta::id(id) AS record_id` so row structs
//! can recover the UUID.

mod group;
mod operation;
mod semester;
mod transaction;
mod user;

pub use group::SurrealGroupRepository;
pub use operation::SurrealOperationRepository;
pub use semester::SurrealSemesterRepository;
pub use transaction::SurrealTransactionRepository;
pub use user::SurrealUserRepository;

use crate::error::DbError;

/// Surface per-statement errors from a mutating query.
fn checked(response: surrealdb::IndexedResults) -> Result<surrealdb::IndexedResults, DbError> {
    response
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))
}

/// First row of a result set, or a typed absence.
fn first_row<T>(rows: Vec<T>, entity: &str, id: String) -> Result<T, DbError> {
    rows.into_iter().next().ok_or_else(|| DbError::NotFound {
        entity: entity.into(),
        id,
    })
}
