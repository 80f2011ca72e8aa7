//! Audit recorder — append-only operation log writer.

use bursar_core::error::BursarResult;
use bursar_core::models::operation::{CreateOperation, Operation, OperationCategory};
use bursar_core::repository::OperationRepository;
use tracing::debug;
use uuid::Uuid;

/// Appends immutable audit records describing who did what.
///
/// The comment string must be rendered by the caller *before* the
/// mutation it describes, so that it captures pre-mutation state
/// (a deleted group's name, a rename's old name). The recorder is
/// always invoked before the business mutation it accompanies.
#[derive(Clone)]
pub struct AuditRecorder<O: OperationRepository> {
    operations: O,
}

impl<O: OperationRepository> AuditRecorder<O> {
    pub fn new(operations: O) -> Self {
        Self { operations }
    }

    /// Append one audit record for `actor_id`.
    pub async fn record(
        &self,
        category: OperationCategory,
        actor_id: Uuid,
        comment: String,
    ) -> BursarResult<Operation> {
        debug!(%category, %actor_id, comment = %comment, "appending audit record");
        self.operations
            .append(CreateOperation {
                category,
                actor_id,
                comment,
            })
            .await
    }

    /// All recorded operations, oldest first.
    pub async fn list(&self) -> BursarResult<Vec<Operation>> {
        self.operations.list().await
    }
}
