//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed role enumeration. A user's role is set at account creation
/// and never changes afterwards — no role-edit operation exists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Observer,
    Accountant,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Observer => "observer",
            Role::Accountant => "accountant",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub phone: String,
    pub login: String,
    pub role: Role,
    /// Current group membership, if any. Cleared when the group is
    /// deleted — a user must never reference a deleted group.
    pub group_id: Option<Uuid>,
    /// Argon2id PHC-format hash. Never serialized outward.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub role: Role,
    pub phone: String,
    pub login: String,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
}

/// Full replacement of the editable profile fields. Login, role and
/// group membership are not editable through this path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUser {
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub phone: String,
}
