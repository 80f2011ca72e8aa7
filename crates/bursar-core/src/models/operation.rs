//! Audit operation record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of the mutation an audit record describes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OperationCategory {
    User,
    Group,
    Semester,
    Payment,
}

impl OperationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationCategory::User => "user",
            OperationCategory::Group => "group",
            OperationCategory::Semester => "semester",
            OperationCategory::Payment => "payment",
        }
    }
}

impl std::fmt::Display for OperationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable audit entry. Written exactly once per mutating action by
/// the orchestrator performing it; never edited or deleted. Belongs
/// to the acting user, not to the entity acted upon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    pub id: Uuid,
    pub category: OperationCategory,
    pub actor_id: Uuid,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateOperation {
    pub category: OperationCategory,
    pub actor_id: Uuid,
    pub comment: String,
}
