//! SurrealDB implementation of [`SemesterRepository`].

use bursar_core::error::BursarResult;
use bursar_core::models::semester::Semester;
use bursar_core::repository::SemesterRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{checked, first_row};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SemesterRow {
    name: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct SemesterRowWithId {
    record_id: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl SemesterRow {
    fn into_semester(self, id: Uuid) -> Semester {
        Semester {
            id,
            name: self.name,
            created_at: self.created_at,
        }
    }
}

impl SemesterRowWithId {
    fn try_into_semester(self) -> Result<Semester, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(Semester {
            id,
            name: self.name,
            created_at: self.created_at,
        })
    }
}

#[derive(Clone)]
pub struct SurrealSemesterRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSemesterRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SemesterRepository for SurrealSemesterRepository<C> {
    async fn create(&self, name: &str) -> BursarResult<Semester> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query("CREATE type::record('semester', $id) SET name = $name")
            .bind(("id", id_str.clone()))
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SemesterRow> = checked(result)?.take(0).map_err(DbError::from)?;
        Ok(first_row(rows, "semester", id_str)?.into_semester(id))
    }

    async fn get_by_id(&self, id: Uuid) -> BursarResult<Semester> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('semester', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SemesterRow> = result.take(0).map_err(DbError::from)?;
        Ok(first_row(rows, "semester", id_str)?.into_semester(id))
    }

    async fn get_by_name(&self, name: &str) -> BursarResult<Semester> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM semester \
                 WHERE name = $name",
            )
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SemesterRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(first_row(rows, "semester", format!("name={name}"))?.try_into_semester()?)
    }

    async fn list(&self) -> BursarResult<Vec<Semester>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM semester \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SemesterRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(SemesterRowWithId::try_into_semester)
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn rename(&self, id: Uuid, name: &str) -> BursarResult<Semester> {
        let id_str = id.to_string();

        let result = self
            .db
            .query("UPDATE type::record('semester', $id) SET name = $name")
            .bind(("id", id_str.clone()))
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SemesterRow> = checked(result)?.take(0).map_err(DbError::from)?;
        Ok(first_row(rows, "semester", id_str)?.into_semester(id))
    }

    async fn delete(&self, id: Uuid) -> BursarResult<()> {
        let result = self
            .db
            .query("DELETE type::record('semester', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;
        checked(result)?;
        Ok(())
    }
}
