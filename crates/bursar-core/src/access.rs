//! Role-based permission gate.
//!
//! Every gated operation is named by an [`Action`]; the allowed-role
//! set per action lives in one declarative table so the routing layer
//! and the business layer cannot drift apart. Self-access (a user
//! reading or refreshing its own record) is a second, distinct
//! authorization mode gated by identity equality, not by role sets.
//!
//! Both checks are pure and synchronous.

use uuid::Uuid;

use crate::error::{BursarError, BursarResult};
use crate::models::user::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateUser,
    EditUser,
    DeleteUser,
    ImportUsers,
    ListUsers,
    ListStudents,
    CreateGroup,
    RenameGroup,
    DeleteGroup,
    ListGroups,
    CreateSemester,
    RenameSemester,
    DeleteSemester,
    CreatePayment,
    ListOwnPayments,
    AddToGroup,
    RemoveFromGroup,
    ListOperations,
}

impl Action {
    /// Stable action name used in denial reasons and log fields.
    pub const fn name(self) -> &'static str {
        match self {
            Action::CreateUser => "create_user",
            Action::EditUser => "edit_user",
            Action::DeleteUser => "delete_user",
            Action::ImportUsers => "import_users",
            Action::ListUsers => "list_users",
            Action::ListStudents => "list_students",
            Action::CreateGroup => "create_group",
            Action::RenameGroup => "rename_group",
            Action::DeleteGroup => "delete_group",
            Action::ListGroups => "list_groups",
            Action::CreateSemester => "create_semester",
            Action::RenameSemester => "rename_semester",
            Action::DeleteSemester => "delete_semester",
            Action::CreatePayment => "create_payment",
            Action::ListOwnPayments => "list_own_payments",
            Action::AddToGroup => "add_to_group",
            Action::RemoveFromGroup => "remove_from_group",
            Action::ListOperations => "list_operations",
        }
    }

    /// The static allowed-role set for this action.
    pub const fn allowed_roles(self) -> &'static [Role] {
        match self {
            Action::CreateUser
            | Action::EditUser
            | Action::DeleteUser
            | Action::ImportUsers
            | Action::ListUsers
            | Action::CreateGroup
            | Action::RenameGroup
            | Action::DeleteGroup
            | Action::CreateSemester
            | Action::RenameSemester
            | Action::DeleteSemester
            | Action::AddToGroup
            | Action::RemoveFromGroup
            | Action::ListOperations => &[Role::Admin],
            Action::ListStudents => &[Role::Admin, Role::Observer, Role::Accountant],
            Action::ListGroups => &[Role::Admin, Role::Accountant],
            Action::CreatePayment | Action::ListOwnPayments => &[Role::Student],
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Check a role against an action's allowed-role set.
pub fn authorize(role: Role, action: Action) -> BursarResult<()> {
    if action.allowed_roles().contains(&role) {
        Ok(())
    } else {
        Err(BursarError::AuthorizationDenied {
            reason: format!("role {role} is not permitted to {action}"),
        })
    }
}

/// Self-access check: the token subject must be the target itself.
/// Bypasses role sets entirely.
pub fn authorize_self(subject_id: Uuid, target_id: Uuid) -> BursarResult<()> {
    if subject_id == target_id {
        Ok(())
    } else {
        Err(BursarError::AuthorizationDenied {
            reason: "only the account owner may access this record".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_only_actions_deny_other_roles() {
        for role in [Role::Student, Role::Observer, Role::Accountant] {
            assert!(authorize(role, Action::CreateUser).is_err());
            assert!(authorize(role, Action::DeleteGroup).is_err());
        }
        assert!(authorize(Role::Admin, Action::CreateUser).is_ok());
    }

    #[test]
    fn payment_actions_are_student_only() {
        for action in [Action::CreatePayment, Action::ListOwnPayments] {
            assert!(authorize(Role::Student, action).is_ok());
            assert!(authorize(Role::Admin, action).is_err());
        }
    }

    #[test]
    fn listing_students_allows_staff_roles() {
        for role in [Role::Admin, Role::Observer, Role::Accountant] {
            assert!(authorize(role, Action::ListStudents).is_ok());
        }
        assert!(authorize(Role::Student, Action::ListStudents).is_err());
    }

    #[test]
    fn self_access_requires_identity_equality() {
        let id = Uuid::new_v4();
        assert!(authorize_self(id, id).is_ok());
        assert!(authorize_self(id, Uuid::new_v4()).is_err());
    }
}
