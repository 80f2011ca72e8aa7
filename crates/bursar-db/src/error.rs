//! Storage-layer error types and their conversion into the shared
//! error taxonomy.

use bursar_core::error::BursarError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    /// Schema, query-check, or row-decode failure. Anything the
    /// storage engine accepted but this crate could not make sense
    /// of ends up here.
    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

/// Absence stays typed across the boundary; everything else is
/// opaque to callers.
impl From<DbError> for BursarError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => BursarError::NotFound { entity, id },
            other => BursarError::Database(other.to_string()),
        }
    }
}
