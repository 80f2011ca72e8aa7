//! Group and semester lifecycle orchestrator.

use bursar_core::access::{self, Action};
use bursar_core::error::{BursarError, BursarResult};
use bursar_core::models::group::Group;
use bursar_core::models::operation::OperationCategory;
use bursar_core::models::semester::Semester;
use bursar_core::models::user::User;
use bursar_core::repository::{
    GroupRepository, OperationRepository, SemesterRepository, UserRepository,
};
use tracing::info;
use uuid::Uuid;

use crate::audit::AuditRecorder;
use crate::comments;

/// Group/semester lifecycle orchestrator. Holds a user repository
/// only to detach members before a group is deleted.
pub struct InfraService<G, S, U, O>
where
    G: GroupRepository,
    S: SemesterRepository,
    U: UserRepository,
    O: OperationRepository,
{
    groups: G,
    semesters: S,
    users: U,
    audit: AuditRecorder<O>,
}

impl<G, S, U, O> InfraService<G, S, U, O>
where
    G: GroupRepository,
    S: SemesterRepository,
    U: UserRepository,
    O: OperationRepository,
{
    pub fn new(groups: G, semesters: S, users: U, audit: AuditRecorder<O>) -> Self {
        Self {
            groups,
            semesters,
            users,
            audit,
        }
    }

    // -------------------------------------------------------------------
    // Groups
    // -------------------------------------------------------------------

    pub async fn create_group(&self, actor: &User, name: &str) -> BursarResult<Group> {
        access::authorize(actor.role, Action::CreateGroup)?;

        match self.groups.get_by_name(name).await {
            Ok(_) => {
                return Err(BursarError::AlreadyExists {
                    entity: "group".into(),
                });
            }
            Err(BursarError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        self.audit
            .record(
                OperationCategory::Group,
                actor.id,
                comments::group_created(name),
            )
            .await?;

        let group = self.groups.create(name).await?;
        info!(group_id = %group.id, name = %group.name, "group created");
        Ok(group)
    }

    /// Rename a group. The audit comment references both the old and
    /// the new name, so it is rendered before the rename happens.
    pub async fn rename_group(
        &self,
        actor: &User,
        group_id: Uuid,
        new_name: &str,
    ) -> BursarResult<Group> {
        access::authorize(actor.role, Action::RenameGroup)?;

        let current = self.groups.get_by_id(group_id).await?;

        match self.groups.get_by_name(new_name).await {
            Ok(existing) if existing.id != group_id => {
                return Err(BursarError::AlreadyExists {
                    entity: "group".into(),
                });
            }
            Ok(_) | Err(BursarError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        self.audit
            .record(
                OperationCategory::Group,
                actor.id,
                comments::group_renamed(&current.name, new_name),
            )
            .await?;

        self.groups.rename(group_id, new_name).await
    }

    /// Delete a group. Every member is detached first so that no user
    /// is left referencing a deleted group; the audit comment still
    /// carries the group's name.
    pub async fn delete_group(&self, actor: &User, group_id: Uuid) -> BursarResult<()> {
        access::authorize(actor.role, Action::DeleteGroup)?;

        let group = self.groups.get_by_id(group_id).await?;

        self.users.clear_group(group_id).await?;

        self.audit
            .record(
                OperationCategory::Group,
                actor.id,
                comments::group_deleted(&group.name),
            )
            .await?;

        self.groups.delete(group_id).await?;
        info!(group_id = %group_id, name = %group.name, "group deleted");
        Ok(())
    }

    pub async fn get_group(&self, actor: &User, group_id: Uuid) -> BursarResult<Group> {
        access::authorize(actor.role, Action::ListGroups)?;
        self.groups.get_by_id(group_id).await
    }

    pub async fn list_groups(&self, actor: &User) -> BursarResult<Vec<Group>> {
        access::authorize(actor.role, Action::ListGroups)?;
        self.groups.list().await
    }

    // -------------------------------------------------------------------
    // Semesters
    // -------------------------------------------------------------------

    pub async fn create_semester(&self, actor: &User, name: &str) -> BursarResult<Semester> {
        access::authorize(actor.role, Action::CreateSemester)?;

        match self.semesters.get_by_name(name).await {
            Ok(_) => {
                return Err(BursarError::AlreadyExists {
                    entity: "semester".into(),
                });
            }
            Err(BursarError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        self.audit
            .record(
                OperationCategory::Semester,
                actor.id,
                comments::semester_created(name),
            )
            .await?;

        let semester = self.semesters.create(name).await?;
        info!(semester_id = %semester.id, name = %semester.name, "semester created");
        Ok(semester)
    }

    pub async fn rename_semester(
        &self,
        actor: &User,
        semester_id: Uuid,
        new_name: &str,
    ) -> BursarResult<Semester> {
        access::authorize(actor.role, Action::RenameSemester)?;

        let current = self.semesters.get_by_id(semester_id).await?;

        match self.semesters.get_by_name(new_name).await {
            Ok(existing) if existing.id != semester_id => {
                return Err(BursarError::AlreadyExists {
                    entity: "semester".into(),
                });
            }
            Ok(_) | Err(BursarError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        self.audit
            .record(
                OperationCategory::Semester,
                actor.id,
                comments::semester_renamed(&current.name, new_name),
            )
            .await?;

        self.semesters.rename(semester_id, new_name).await
    }

    pub async fn delete_semester(&self, actor: &User, semester_id: Uuid) -> BursarResult<()> {
        access::authorize(actor.role, Action::DeleteSemester)?;

        let semester = self.semesters.get_by_id(semester_id).await?;

        self.audit
            .record(
                OperationCategory::Semester,
                actor.id,
                comments::semester_deleted(&semester.name),
            )
            .await?;

        self.semesters.delete(semester_id).await?;
        info!(semester_id = %semester_id, name = %semester.name, "semester deleted");
        Ok(())
    }

    /// Semesters are public reference data — no gate.
    pub async fn list_semesters(&self) -> BursarResult<Vec<Semester>> {
        self.semesters.list().await
    }
}
