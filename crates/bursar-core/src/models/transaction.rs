//! Tuition payment transaction model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub semester_id: Uuid,
    pub amount: f64,
    /// Human-readable payment description, rendered at creation time.
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied payment input. The paying user and the comment are
/// filled in by the payment orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransaction {
    pub semester_id: Uuid,
    pub amount: f64,
}

/// Fully resolved transaction record, ready for insertion.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: Uuid,
    pub semester_id: Uuid,
    pub amount: f64,
    pub comment: String,
}
