//! BURSAR Service — the audit recorder and the mutation
//! orchestrators (user lifecycle, group/semester lifecycle, payments
//! and group membership).
//!
//! Every orchestrated mutation follows the same step order:
//! permission gate, existence/uniqueness validation, audit write
//! (rendered from pre-mutation state), persistence mutation,
//! authoritative re-fetch. The audit write and the mutation are two
//! independent storage round-trips — a crash between them can leave
//! an orphaned audit entry. That gap is accepted and documented, not
//! papered over.

pub mod audit;
pub mod comments;
pub mod infra;
pub mod operations;
pub mod users;

pub use audit::AuditRecorder;
pub use infra::InfraService;
pub use operations::OperationService;
pub use users::{ImportOutcome, UserDirectory};
