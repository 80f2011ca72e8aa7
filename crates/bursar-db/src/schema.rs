//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints. Uniqueness of `user.login`, `group.name` and
//! `semester.name` is backed by unique indexes — the service layer
//! additionally pre-checks these with a read, so the index is the
//! last line of defense against concurrent creators.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD surname ON TABLE user TYPE string;
DEFINE FIELD patronymic ON TABLE user TYPE string;
DEFINE FIELD phone ON TABLE user TYPE string;
DEFINE FIELD login ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['student', 'observer', 'accountant', 'admin'];
DEFINE FIELD group_id ON TABLE user TYPE option<string>;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_login ON TABLE user COLUMNS login UNIQUE;

-- =======================================================================
-- Groups
-- =======================================================================
DEFINE TABLE group SCHEMAFULL;
DEFINE FIELD name ON TABLE group TYPE string;
DEFINE FIELD created_at ON TABLE group TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_group_name ON TABLE group COLUMNS name UNIQUE;

-- =======================================================================
-- Semesters
-- =======================================================================
DEFINE TABLE semester SCHEMAFULL;
DEFINE FIELD name ON TABLE semester TYPE string;
DEFINE FIELD created_at ON TABLE semester TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_semester_name ON TABLE semester COLUMNS name UNIQUE;

-- =======================================================================
-- Tuition payment transactions (append-only)
-- =======================================================================
DEFINE TABLE transaction SCHEMAFULL;
DEFINE FIELD user_id ON TABLE transaction TYPE string;
DEFINE FIELD semester_id ON TABLE transaction TYPE string;
DEFINE FIELD amount ON TABLE transaction TYPE number;
DEFINE FIELD comment ON TABLE transaction TYPE string;
DEFINE FIELD created_at ON TABLE transaction TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Audit operations (append-only)
-- =======================================================================
DEFINE TABLE operation SCHEMAFULL;
DEFINE FIELD category ON TABLE operation TYPE string \
    ASSERT $value IN ['user', 'group', 'semester', 'payment'];
DEFINE FIELD actor_id ON TABLE operation TYPE string;
DEFINE FIELD comment ON TABLE operation TYPE string;
DEFINE FIELD created_at ON TABLE operation TYPE datetime \
    DEFAULT time::now();
";

/// Highest migration version already recorded, or 0 on a fresh
/// store.
async fn applied_version<C: Connection>(db: &Surreal<C>) -> Result<u32, DbError> {
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    Ok(records.first().map(|m| m.version).unwrap_or(0))
}

async fn apply<C: Connection>(db: &Surreal<C>, migration: &Migration) -> Result<(), DbError> {
    info!(
        version = migration.version,
        name = migration.name,
        "applying schema migration"
    );

    db.query(migration.sql).await?.check().map_err(|e| {
        DbError::Migration(format!(
            "v{} '{}' failed: {e}",
            migration.version, migration.name,
        ))
    })?;

    db.query("CREATE _migration SET version = $version, name = $name")
        .bind(("version", migration.version))
        .bind(("name", migration.name))
        .await?
        .check()
        .map_err(|e| DbError::Migration(format!("could not record v{}: {e}", migration.version)))?;

    Ok(())
}

/// Bring the schema up to date: ensure the `_migration` tracking
/// table exists, then apply every migration past the recorded
/// version, in order. Safe to call on every startup.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let current = applied_version(db).await?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        apply(db, migration).await?;
        info!(version = migration.version, "schema migration applied");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
