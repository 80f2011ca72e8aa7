//! SurrealDB implementation of [`TransactionRepository`].
//!
//! Transactions are append-only: no update or delete path exists.

use bursar_core::error::BursarResult;
use bursar_core::models::transaction::{NewTransaction, Transaction};
use bursar_core::repository::TransactionRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{checked, first_row};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct TransactionRow {
    user_id: String,
    semester_id: String,
    amount: f64,
    comment: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct TransactionRowWithId {
    record_id: String,
    user_id: String,
    semester_id: String,
    amount: f64,
    comment: String,
    created_at: DateTime<Utc>,
}

impl TransactionRow {
    fn into_transaction(self, id: Uuid) -> Result<Transaction, DbError> {
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Migration(format!("invalid user UUID: {e}")))?;
        let semester_id = Uuid::parse_str(&self.semester_id)
            .map_err(|e| DbError::Migration(format!("invalid semester UUID: {e}")))?;
        Ok(Transaction {
            id,
            user_id,
            semester_id,
            amount: self.amount,
            comment: self.comment,
            created_at: self.created_at,
        })
    }
}

impl TransactionRowWithId {
    fn try_into_transaction(self) -> Result<Transaction, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        TransactionRow {
            user_id: self.user_id,
            semester_id: self.semester_id,
            amount: self.amount,
            comment: self.comment,
            created_at: self.created_at,
        }
        .into_transaction(id)
    }
}

#[derive(Clone)]
pub struct SurrealTransactionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTransactionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TransactionRepository for SurrealTransactionRepository<C> {
    async fn create(&self, input: NewTransaction) -> BursarResult<Transaction> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('transaction', $id) SET \
                 user_id = $user_id, semester_id = $semester_id, \
                 amount = $amount, comment = $comment",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("semester_id", input.semester_id.to_string()))
            .bind(("amount", input.amount))
            .bind(("comment", input.comment))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TransactionRow> = checked(result)?.take(0).map_err(DbError::from)?;
        Ok(first_row(rows, "transaction", id_str)?.into_transaction(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> BursarResult<Transaction> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('transaction', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TransactionRow> = result.take(0).map_err(DbError::from)?;
        Ok(first_row(rows, "transaction", id_str)?.into_transaction(id)?)
    }

    async fn list_by_user(&self, user_id: Uuid) -> BursarResult<Vec<Transaction>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM transaction \
                 WHERE user_id = $user_id ORDER BY created_at ASC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TransactionRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(TransactionRowWithId::try_into_transaction)
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}
