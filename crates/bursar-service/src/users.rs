//! User lifecycle orchestrator: create, edit, delete, reads, and
//! bulk import.

use bursar_core::access::{self, Action};
use bursar_core::error::{BursarError, BursarResult};
use bursar_core::models::operation::OperationCategory;
use bursar_core::models::user::{CreateUser, Role, UpdateUser, User};
use bursar_core::repository::{OperationRepository, UserRepository};
use tracing::{info, warn};
use uuid::Uuid;

use crate::audit::AuditRecorder;
use crate::comments;

/// Result of a bulk import batch. The batch itself never fails:
/// rejected rows are counted, not propagated.
#[derive(Debug)]
pub struct ImportOutcome {
    pub created: Vec<User>,
    pub skipped: usize,
}

/// User lifecycle orchestrator. Receives its storage and audit
/// collaborators at construction.
pub struct UserDirectory<U: UserRepository, O: OperationRepository> {
    users: U,
    audit: AuditRecorder<O>,
}

impl<U: UserRepository, O: OperationRepository> UserDirectory<U, O> {
    pub fn new(users: U, audit: AuditRecorder<O>) -> Self {
        Self { users, audit }
    }

    /// Create a user. Duplicate logins fail with `AlreadyExists`.
    pub async fn create_user(&self, actor: &User, input: CreateUser) -> BursarResult<User> {
        access::authorize(actor.role, Action::CreateUser)?;

        match self.users.get_by_login(&input.login).await {
            Ok(_) => {
                return Err(BursarError::AlreadyExists {
                    entity: "user".into(),
                });
            }
            Err(BursarError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        self.audit
            .record(
                OperationCategory::User,
                actor.id,
                comments::user_created(&input),
            )
            .await?;

        let user = self.users.create(input).await?;
        info!(user_id = %user.id, login = %user.login, "user created");
        Ok(user)
    }

    /// Replace a user's editable profile fields. The audit comment
    /// captures the profile as it was before the edit.
    pub async fn edit_user(
        &self,
        actor: &User,
        user_id: Uuid,
        input: UpdateUser,
    ) -> BursarResult<User> {
        access::authorize(actor.role, Action::EditUser)?;

        let current = self.users.get_by_id(user_id).await?;

        self.audit
            .record(
                OperationCategory::User,
                actor.id,
                comments::user_edited(&current),
            )
            .await?;

        self.users.update(user_id, input).await
    }

    /// Delete a user account.
    ///
    /// Admin accounts can never be deleted, whatever the caller's own
    /// role — this is a system invariant, not a permission.
    pub async fn delete_user(&self, actor: &User, user_id: Uuid) -> BursarResult<()> {
        access::authorize(actor.role, Action::DeleteUser)?;

        let target = self.users.get_by_id(user_id).await?;
        if target.role == Role::Admin {
            return Err(BursarError::AuthorizationDenied {
                reason: "admin accounts cannot be deleted".into(),
            });
        }

        self.audit
            .record(
                OperationCategory::User,
                actor.id,
                comments::user_deleted(&target),
            )
            .await?;

        self.users.delete(user_id).await?;
        info!(user_id = %user_id, "user deleted");
        Ok(())
    }

    /// Bulk import of candidate user rows. Each candidate goes
    /// through the same create-user validation independently; rows
    /// that fail (duplicate login, storage rejection) are skipped
    /// with a warning and the batch continues. Exactly one audit
    /// record summarizes the batch.
    pub async fn import_users(
        &self,
        actor: &User,
        candidates: Vec<CreateUser>,
    ) -> BursarResult<ImportOutcome> {
        access::authorize(actor.role, Action::ImportUsers)?;

        let mut created = Vec::new();
        let mut skipped = 0usize;

        for candidate in candidates {
            let login = candidate.login.clone();

            match self.users.get_by_login(&login).await {
                Ok(_) => {
                    warn!(login = %login, "import: duplicate login, row skipped");
                    skipped += 1;
                    continue;
                }
                Err(BursarError::NotFound { .. }) => {}
                Err(e) => {
                    warn!(login = %login, error = %e, "import: lookup failed, row skipped");
                    skipped += 1;
                    continue;
                }
            }

            match self.users.create(candidate).await {
                Ok(user) => created.push(user),
                Err(e) => {
                    warn!(login = %login, error = %e, "import: create failed, row skipped");
                    skipped += 1;
                }
            }
        }

        self.audit
            .record(
                OperationCategory::User,
                actor.id,
                comments::users_imported(created.len()),
            )
            .await?;

        info!(created = created.len(), skipped, "user import finished");
        Ok(ImportOutcome { created, skipped })
    }

    /// A user's own record — gated by identity equality, not role.
    pub async fn profile(&self, actor: &User, target_id: Uuid) -> BursarResult<User> {
        access::authorize_self(actor.id, target_id)?;
        self.users.get_by_id(target_id).await
    }

    /// Fetch one student. A user that exists but is not a student is
    /// reported as absent.
    pub async fn get_student(&self, actor: &User, student_id: Uuid) -> BursarResult<User> {
        access::authorize(actor.role, Action::ListStudents)?;

        let user = self.users.get_by_id(student_id).await?;
        if user.role != Role::Student {
            return Err(BursarError::NotFound {
                entity: "student".into(),
                id: student_id.to_string(),
            });
        }
        Ok(user)
    }

    pub async fn list_students(&self, actor: &User) -> BursarResult<Vec<User>> {
        access::authorize(actor.role, Action::ListStudents)?;
        self.users.list_students().await
    }

    pub async fn list_users(&self, actor: &User) -> BursarResult<Vec<User>> {
        access::authorize(actor.role, Action::ListUsers)?;
        self.users.list().await
    }
}
