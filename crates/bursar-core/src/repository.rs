//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Absent rows surface as
//! [`BursarError::NotFound`]; callers that treat absence as a normal
//! outcome (uniqueness pre-checks, login fallbacks) match on it.

use uuid::Uuid;

use crate::error::BursarResult;
use crate::models::{
    group::Group,
    operation::{CreateOperation, Operation},
    semester::Semester,
    transaction::{NewTransaction, Transaction},
    user::{CreateUser, UpdateUser, User},
};

pub trait UserRepository: Send + Sync {
    /// Create a user. The raw password in the input is hashed before
    /// storage; the stored hash is never returned to API callers.
    fn create(&self, input: CreateUser) -> impl Future<Output = BursarResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = BursarResult<User>> + Send;
    fn get_by_login(&self, login: &str) -> impl Future<Output = BursarResult<User>> + Send;
    fn list(&self) -> impl Future<Output = BursarResult<Vec<User>>> + Send;
    fn list_students(&self) -> impl Future<Output = BursarResult<Vec<User>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = BursarResult<User>> + Send;
    /// Set or clear a single user's group membership.
    fn set_group(
        &self,
        id: Uuid,
        group_id: Option<Uuid>,
    ) -> impl Future<Output = BursarResult<()>> + Send;
    /// Detach every member of a group in one pass. Used before group
    /// deletion so no user ends up referencing a deleted group.
    fn clear_group(&self, group_id: Uuid) -> impl Future<Output = BursarResult<()>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = BursarResult<()>> + Send;
}

pub trait GroupRepository: Send + Sync {
    fn create(&self, name: &str) -> impl Future<Output = BursarResult<Group>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = BursarResult<Group>> + Send;
    fn get_by_name(&self, name: &str) -> impl Future<Output = BursarResult<Group>> + Send;
    fn list(&self) -> impl Future<Output = BursarResult<Vec<Group>>> + Send;
    fn rename(&self, id: Uuid, name: &str) -> impl Future<Output = BursarResult<Group>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = BursarResult<()>> + Send;
}

pub trait SemesterRepository: Send + Sync {
    fn create(&self, name: &str) -> impl Future<Output = BursarResult<Semester>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = BursarResult<Semester>> + Send;
    fn get_by_name(&self, name: &str) -> impl Future<Output = BursarResult<Semester>> + Send;
    fn list(&self) -> impl Future<Output = BursarResult<Vec<Semester>>> + Send;
    fn rename(&self, id: Uuid, name: &str)
    -> impl Future<Output = BursarResult<Semester>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = BursarResult<()>> + Send;
}

pub trait TransactionRepository: Send + Sync {
    fn create(
        &self,
        input: NewTransaction,
    ) -> impl Future<Output = BursarResult<Transaction>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = BursarResult<Transaction>> + Send;
    fn list_by_user(&self, user_id: Uuid)
    -> impl Future<Output = BursarResult<Vec<Transaction>>> + Send;
}

/// Append-only audit log. No update or delete operations exist.
pub trait OperationRepository: Send + Sync {
    fn append(
        &self,
        input: CreateOperation,
    ) -> impl Future<Output = BursarResult<Operation>> + Send;
    fn list(&self) -> impl Future<Output = BursarResult<Vec<Operation>>> + Send;
}
