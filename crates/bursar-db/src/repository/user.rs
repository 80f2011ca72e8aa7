//! SurrealDB implementation of [`UserRepository`].
//!
//! Password hashing happens here, on the write path: the raw
//! password never reaches the storage engine. Argon2id with the
//! OWASP-recommended cost (19 MiB memory, 2 iterations, parallelism
//! 1), a random per-hash salt, and an optional server-side pepper.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use bursar_core::error::BursarResult;
use bursar_core::models::user::{CreateUser, Role, UpdateUser, User};
use bursar_core::repository::UserRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{checked, first_row};
use crate::error::DbError;

/// Row shape for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    name: String,
    surname: String,
    patronymic: String,
    phone: String,
    login: String,
    role: String,
    group_id: Option<String>,
    password_hash: String,
    created_at: DateTime<Utc>,
}

/// Row shape carrying the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    name: String,
    surname: String,
    patronymic: String,
    phone: String,
    login: String,
    role: String,
    group_id: Option<String>,
    password_hash: String,
    created_at: DateTime<Utc>,
}

fn parse_role(s: &str) -> Result<Role, DbError> {
    match s {
        "student" => Ok(Role::Student),
        "observer" => Ok(Role::Observer),
        "accountant" => Ok(Role::Accountant),
        "admin" => Ok(Role::Admin),
        other => Err(DbError::Migration(format!("unknown user role: {other}"))),
    }
}

fn parse_group_id(group_id: Option<String>) -> Result<Option<Uuid>, DbError> {
    group_id
        .map(|g| {
            Uuid::parse_str(&g).map_err(|e| DbError::Migration(format!("invalid group UUID: {e}")))
        })
        .transpose()
}

impl UserRow {
    fn into_user(self, id: Uuid) -> Result<User, DbError> {
        Ok(User {
            id,
            name: self.name,
            surname: self.surname,
            patronymic: self.patronymic,
            phone: self.phone,
            login: self.login,
            role: parse_role(&self.role)?,
            group_id: parse_group_id(self.group_id)?,
            password_hash: self.password_hash,
            created_at: self.created_at,
        })
    }
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        UserRow {
            name: self.name,
            surname: self.surname,
            patronymic: self.patronymic,
            phone: self.phone,
            login: self.login,
            role: self.role,
            group_id: self.group_id,
            password_hash: self.password_hash,
            created_at: self.created_at,
        }
        .into_user(id)
    }
}

/// Hash a password with Argon2id. The pepper, when present, is
/// prepended before hashing; verification must do the same.
fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, DbError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Migration(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| DbError::Migration(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: String) -> Self {
        Self {
            db,
            pepper: Some(pepper),
        }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> BursarResult<User> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let password_hash = hash_password(&input.password, self.pepper.as_deref())?;

        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 name = $name, surname = $surname, patronymic = $patronymic, \
                 phone = $phone, login = $login, role = $role, \
                 group_id = NONE, \
                 password_hash = $password_hash",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("surname", input.surname))
            .bind(("patronymic", input.patronymic))
            .bind(("phone", input.phone))
            .bind(("login", input.login))
            .bind(("role", input.role.as_str().to_string()))
            .bind(("password_hash", password_hash))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = checked(result)?.take(0).map_err(DbError::from)?;
        Ok(first_row(rows, "user", id_str)?.into_user(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> BursarResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        Ok(first_row(rows, "user", id_str)?.into_user(id)?)
    }

    async fn get_by_login(&self, login: &str) -> BursarResult<User> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE login = $login",
            )
            .bind(("login", login.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(first_row(rows, "user", format!("login={login}"))?.try_into_user()?)
    }

    async fn list(&self) -> BursarResult<Vec<User>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(UserRowWithId::try_into_user)
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn list_students(&self) -> BursarResult<Vec<User>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE role = 'student' ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(UserRowWithId::try_into_user)
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn update(&self, id: Uuid, input: UpdateUser) -> BursarResult<User> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('user', $id) SET \
                 name = $name, surname = $surname, \
                 patronymic = $patronymic, phone = $phone",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("surname", input.surname))
            .bind(("patronymic", input.patronymic))
            .bind(("phone", input.phone))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = checked(result)?.take(0).map_err(DbError::from)?;
        Ok(first_row(rows, "user", id_str)?.into_user(id)?)
    }

    async fn set_group(&self, id: Uuid, group_id: Option<Uuid>) -> BursarResult<()> {
        let result = self
            .db
            .query("UPDATE type::record('user', $id) SET group_id = $group_id")
            .bind(("id", id.to_string()))
            .bind(("group_id", group_id.map(|g| g.to_string())))
            .await
            .map_err(DbError::from)?;
        checked(result)?;
        Ok(())
    }

    async fn clear_group(&self, group_id: Uuid) -> BursarResult<()> {
        let result = self
            .db
            .query("UPDATE user SET group_id = NONE WHERE group_id = $group_id")
            .bind(("group_id", group_id.to_string()))
            .await
            .map_err(DbError::from)?;
        checked(result)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> BursarResult<()> {
        let result = self
            .db
            .query("DELETE type::record('user', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;
        checked(result)?;
        Ok(())
    }
}
