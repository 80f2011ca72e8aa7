//! Payment and group-membership orchestrator, plus the audit log
//! read side.

use bursar_core::access::{self, Action};
use bursar_core::error::{BursarError, BursarResult};
use bursar_core::models::group::Group;
use bursar_core::models::operation::{Operation, OperationCategory};
use bursar_core::models::transaction::{CreateTransaction, NewTransaction, Transaction};
use bursar_core::models::user::{Role, User};
use bursar_core::repository::{
    GroupRepository, OperationRepository, SemesterRepository, TransactionRepository,
    UserRepository,
};
use tracing::info;
use uuid::Uuid;

use crate::audit::AuditRecorder;
use crate::comments;

/// Payments and group membership. Membership audit records fall under
/// the `group` category; payments under `payment`.
pub struct OperationService<U, G, S, T, O>
where
    U: UserRepository,
    G: GroupRepository,
    S: SemesterRepository,
    T: TransactionRepository,
    O: OperationRepository,
{
    users: U,
    groups: G,
    semesters: S,
    transactions: T,
    audit: AuditRecorder<O>,
}

impl<U, G, S, T, O> OperationService<U, G, S, T, O>
where
    U: UserRepository,
    G: GroupRepository,
    S: SemesterRepository,
    T: TransactionRepository,
    O: OperationRepository,
{
    pub fn new(users: U, groups: G, semesters: S, transactions: T, audit: AuditRecorder<O>) -> Self {
        Self {
            users,
            groups,
            semesters,
            transactions,
            audit,
        }
    }

    /// Fetch a user and require the student role; anything else is
    /// reported as an absent student.
    async fn get_student(&self, student_id: Uuid) -> BursarResult<User> {
        let user = self.users.get_by_id(student_id).await?;
        if user.role != Role::Student {
            return Err(BursarError::NotFound {
                entity: "student".into(),
                id: student_id.to_string(),
            });
        }
        Ok(user)
    }

    /// Record a tuition payment by the acting student. The payment
    /// comment is rendered from the semester's name and the amount
    /// before anything is written.
    pub async fn create_transaction(
        &self,
        actor: &User,
        input: CreateTransaction,
    ) -> BursarResult<Transaction> {
        access::authorize(actor.role, Action::CreatePayment)?;

        let semester = self.semesters.get_by_id(input.semester_id).await?;
        let comment = comments::tuition_payment(&semester.name, input.amount);

        self.audit
            .record(OperationCategory::Payment, actor.id, comment.clone())
            .await?;

        let transaction = self
            .transactions
            .create(NewTransaction {
                user_id: actor.id,
                semester_id: semester.id,
                amount: input.amount,
                comment,
            })
            .await?;

        info!(
            transaction_id = %transaction.id,
            user_id = %actor.id,
            semester = %semester.name,
            amount = transaction.amount,
            "tuition payment recorded"
        );
        Ok(transaction)
    }

    /// Assign a student to a group; returns the group re-read after
    /// the assignment.
    pub async fn add_student_to_group(
        &self,
        actor: &User,
        student_id: Uuid,
        group_id: Uuid,
    ) -> BursarResult<Group> {
        access::authorize(actor.role, Action::AddToGroup)?;

        let group = self.groups.get_by_id(group_id).await?;
        let student = self.get_student(student_id).await?;

        self.audit
            .record(
                OperationCategory::Group,
                actor.id,
                comments::student_added_to_group(&student, &group.name),
            )
            .await?;

        self.users.set_group(student.id, Some(group.id)).await?;

        self.groups.get_by_id(group_id).await
    }

    /// Detach a student from their current group. A student with no
    /// membership is an error, not a silent no-op.
    pub async fn remove_student_from_group(
        &self,
        actor: &User,
        student_id: Uuid,
    ) -> BursarResult<()> {
        access::authorize(actor.role, Action::RemoveFromGroup)?;

        let student = self.get_student(student_id).await?;
        let Some(group_id) = student.group_id else {
            return Err(BursarError::NotFound {
                entity: "group".into(),
                id: format!("membership of user {student_id}"),
            });
        };

        let group = self.groups.get_by_id(group_id).await?;

        self.audit
            .record(
                OperationCategory::Group,
                actor.id,
                comments::student_removed_from_group(&student, &group.name),
            )
            .await?;

        self.users.set_group(student.id, None).await?;
        info!(user_id = %student_id, group = %group.name, "student removed from group");
        Ok(())
    }

    /// The full audit log, oldest first.
    pub async fn list_operations(&self, actor: &User) -> BursarResult<Vec<Operation>> {
        access::authorize(actor.role, Action::ListOperations)?;
        self.audit.list().await
    }

    /// A student's own payment history, always scoped to the actor.
    pub async fn list_own_transactions(&self, actor: &User) -> BursarResult<Vec<Transaction>> {
        access::authorize(actor.role, Action::ListOwnPayments)?;
        self.transactions.list_by_user(actor.id).await
    }
}
