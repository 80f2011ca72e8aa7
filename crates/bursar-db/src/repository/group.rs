//! SurrealDB implementation of [`GroupRepository`].

use bursar_core::error::BursarResult;
use bursar_core::models::group::Group;
use bursar_core::repository::GroupRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{checked, first_row};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct GroupRow {
    name: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct GroupRowWithId {
    record_id: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl GroupRow {
    fn into_group(self, id: Uuid) -> Group {
        Group {
            id,
            name: self.name,
            created_at: self.created_at,
        }
    }
}

impl GroupRowWithId {
    fn try_into_group(self) -> Result<Group, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(Group {
            id,
            name: self.name,
            created_at: self.created_at,
        })
    }
}

#[derive(Clone)]
pub struct SurrealGroupRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealGroupRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> GroupRepository for SurrealGroupRepository<C> {
    async fn create(&self, name: &str) -> BursarResult<Group> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query("CREATE type::record('group', $id) SET name = $name")
            .bind(("id", id_str.clone()))
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRow> = checked(result)?.take(0).map_err(DbError::from)?;
        Ok(first_row(rows, "group", id_str)?.into_group(id))
    }

    async fn get_by_id(&self, id: Uuid) -> BursarResult<Group> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('group', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        Ok(first_row(rows, "group", id_str)?.into_group(id))
    }

    async fn get_by_name(&self, name: &str) -> BursarResult<Group> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM group \
                 WHERE name = $name",
            )
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(first_row(rows, "group", format!("name={name}"))?.try_into_group()?)
    }

    async fn list(&self) -> BursarResult<Vec<Group>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM group \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(GroupRowWithId::try_into_group)
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn rename(&self, id: Uuid, name: &str) -> BursarResult<Group> {
        let id_str = id.to_string();

        let result = self
            .db
            .query("UPDATE type::record('group', $id) SET name = $name")
            .bind(("id", id_str.clone()))
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRow> = checked(result)?.take(0).map_err(DbError::from)?;
        Ok(first_row(rows, "group", id_str)?.into_group(id))
    }

    async fn delete(&self, id: Uuid) -> BursarResult<()> {
        let result = self
            .db
            .query("DELETE type::record('group', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;
        checked(result)?;
        Ok(())
    }
}
