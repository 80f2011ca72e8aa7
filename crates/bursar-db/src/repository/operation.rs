//! SurrealDB implementation of [`OperationRepository`].
//!
//! The operation table is the audit log. It is append-only: this
//! repository deliberately exposes no update or delete path.

use bursar_core::error::BursarResult;
use bursar_core::models::operation::{CreateOperation, Operation, OperationCategory};
use bursar_core::repository::OperationRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{checked, first_row};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct OperationRow {
    category: String,
    actor_id: String,
    comment: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct OperationRowWithId {
    record_id: String,
    category: String,
    actor_id: String,
    comment: String,
    created_at: DateTime<Utc>,
}

fn parse_category(s: &str) -> Result<OperationCategory, DbError> {
    match s {
        "user" => Ok(OperationCategory::User),
        "group" => Ok(OperationCategory::Group),
        "semester" => Ok(OperationCategory::Semester),
        "payment" => Ok(OperationCategory::Payment),
        other => Err(DbError::Migration(format!(
            "unknown operation category: {other}"
        ))),
    }
}

impl OperationRow {
    fn into_operation(self, id: Uuid) -> Result<Operation, DbError> {
        let actor_id = Uuid::parse_str(&self.actor_id)
            .map_err(|e| DbError::Migration(format!("invalid actor UUID: {e}")))?;
        Ok(Operation {
            id,
            category: parse_category(&self.category)?,
            actor_id,
            comment: self.comment,
            created_at: self.created_at,
        })
    }
}

impl OperationRowWithId {
    fn try_into_operation(self) -> Result<Operation, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        OperationRow {
            category: self.category,
            actor_id: self.actor_id,
            comment: self.comment,
            created_at: self.created_at,
        }
        .into_operation(id)
    }
}

#[derive(Clone)]
pub struct SurrealOperationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOperationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OperationRepository for SurrealOperationRepository<C> {
    async fn append(&self, input: CreateOperation) -> BursarResult<Operation> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('operation', $id) SET \
                 category = $category, actor_id = $actor_id, \
                 comment = $comment",
            )
            .bind(("id", id_str.clone()))
            .bind(("category", input.category.as_str().to_string()))
            .bind(("actor_id", input.actor_id.to_string()))
            .bind(("comment", input.comment))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OperationRow> = checked(result)?.take(0).map_err(DbError::from)?;
        Ok(first_row(rows, "operation", id_str)?.into_operation(id)?)
    }

    async fn list(&self) -> BursarResult<Vec<Operation>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM operation \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OperationRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(OperationRowWithId::try_into_operation)
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}
