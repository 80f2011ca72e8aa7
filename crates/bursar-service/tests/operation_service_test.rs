//! Integration tests for payments, group membership, and the audit
//! log read side.

use bursar_core::error::BursarError;
use bursar_core::models::operation::OperationCategory;
use bursar_core::models::transaction::CreateTransaction;
use bursar_core::models::user::{CreateUser, Role, User};
use bursar_core::repository::{
    GroupRepository, OperationRepository, SemesterRepository, UserRepository,
};
use bursar_db::repository::{
    SurrealGroupRepository, SurrealOperationRepository, SurrealSemesterRepository,
    SurrealTransactionRepository, SurrealUserRepository,
};
use bursar_service::{AuditRecorder, OperationService};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

type Service = OperationService<
    SurrealUserRepository<Db>,
    SurrealGroupRepository<Db>,
    SurrealSemesterRepository<Db>,
    SurrealTransactionRepository<Db>,
    SurrealOperationRepository<Db>,
>;

fn new_user(login: &str, role: Role) -> CreateUser {
    CreateUser {
        name: "Ivan".into(),
        surname: "Petrov".into(),
        patronymic: "Sergeevich".into(),
        role,
        phone: "+700000000".into(),
        login: login.into(),
        password: "hunter2hunter2".into(),
    }
}

async fn setup() -> (Service, User, SurrealOperationRepository<Db>, Surreal<Db>) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    bursar_db::run_migrations(&db).await.unwrap();

    let users = SurrealUserRepository::new(db.clone());
    let admin = users.create(new_user("root-admin", Role::Admin)).await.unwrap();

    let ops = SurrealOperationRepository::new(db.clone());
    let service = OperationService::new(
        users,
        SurrealGroupRepository::new(db.clone()),
        SurrealSemesterRepository::new(db.clone()),
        SurrealTransactionRepository::new(db.clone()),
        AuditRecorder::new(ops.clone()),
    );

    (service, admin, ops, db)
}

async fn seed_student(db: &Surreal<Db>, login: &str) -> User {
    SurrealUserRepository::new(db.clone())
        .create(new_user(login, Role::Student))
        .await
        .unwrap()
}

#[tokio::test]
async fn payment_records_audit_and_transaction() {
    let (service, _admin, ops, db) = setup().await;

    let student = seed_student(&db, "payer").await;
    let semester = SurrealSemesterRepository::new(db.clone())
        .create("2026 Fall")
        .await
        .unwrap();

    let tx = service
        .create_transaction(
            &student,
            CreateTransaction {
                semester_id: semester.id,
                amount: 45_000.0,
            },
        )
        .await
        .unwrap();

    // The payment belongs to the acting student, never a third party.
    assert_eq!(tx.user_id, student.id);
    assert_eq!(tx.semester_id, semester.id);
    assert_eq!(tx.comment, "Tuition payment for semester 2026 Fall of 45000");

    let log = ops.list().await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].category, OperationCategory::Payment);
    assert_eq!(log[0].actor_id, student.id);
    assert_eq!(log[0].comment, tx.comment);

    let own = service.list_own_transactions(&student).await.unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].id, tx.id);
}

#[tokio::test]
async fn payment_is_student_only() {
    let (service, admin, ops, db) = setup().await;

    let semester = SurrealSemesterRepository::new(db)
        .create("2026 Fall")
        .await
        .unwrap();

    let err = service
        .create_transaction(
            &admin,
            CreateTransaction {
                semester_id: semester.id,
                amount: 100.0,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BursarError::AuthorizationDenied { .. }));
    assert!(ops.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn own_payment_history_is_student_only() {
    let (service, admin, _ops, db) = setup().await;

    let err = service.list_own_transactions(&admin).await.unwrap_err();
    assert!(matches!(err, BursarError::AuthorizationDenied { .. }));

    let student = seed_student(&db, "payer").await;
    assert!(service.list_own_transactions(&student).await.unwrap().is_empty());
}

#[tokio::test]
async fn payment_for_unknown_semester_fails_before_audit() {
    let (service, _admin, ops, db) = setup().await;
    let student = seed_student(&db, "payer").await;

    let err = service
        .create_transaction(
            &student,
            CreateTransaction {
                semester_id: Uuid::new_v4(),
                amount: 100.0,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BursarError::NotFound { .. }));
    assert!(ops.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn membership_assignment_roundtrip() {
    let (service, admin, ops, db) = setup().await;

    let student = seed_student(&db, "member").await;
    let group = SurrealGroupRepository::new(db.clone())
        .create("B21-501")
        .await
        .unwrap();

    let returned = service
        .add_student_to_group(&admin, student.id, group.id)
        .await
        .unwrap();
    assert_eq!(returned.id, group.id);

    let users = SurrealUserRepository::new(db);
    assert_eq!(
        users.get_by_id(student.id).await.unwrap().group_id,
        Some(group.id)
    );

    service
        .remove_student_from_group(&admin, student.id)
        .await
        .unwrap();
    assert_eq!(users.get_by_id(student.id).await.unwrap().group_id, None);

    let log = ops.list().await.unwrap();
    assert_eq!(log.len(), 2);
    assert!(log.iter().all(|op| op.category == OperationCategory::Group));
    assert_eq!(log[0].comment, "Added student Petrov Ivan to group B21-501");
    assert_eq!(
        log[1].comment,
        "Removed student Petrov Ivan from group B21-501"
    );
}

#[tokio::test]
async fn membership_target_must_be_a_student() {
    let (service, admin, ops, db) = setup().await;

    let observer = SurrealUserRepository::new(db.clone())
        .create(new_user("obs", Role::Observer))
        .await
        .unwrap();
    let group = SurrealGroupRepository::new(db)
        .create("B21-501")
        .await
        .unwrap();

    let err = service
        .add_student_to_group(&admin, observer.id, group.id)
        .await
        .unwrap_err();
    assert!(matches!(err, BursarError::NotFound { .. }));
    assert!(ops.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn removing_unassigned_student_is_not_found() {
    let (service, admin, ops, db) = setup().await;
    let student = seed_student(&db, "loner").await;

    let err = service
        .remove_student_from_group(&admin, student.id)
        .await
        .unwrap_err();
    assert!(matches!(err, BursarError::NotFound { .. }));
    assert!(ops.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn membership_changes_require_admin() {
    let (service, _admin, _ops, db) = setup().await;

    let student = seed_student(&db, "member").await;
    let accountant = SurrealUserRepository::new(db.clone())
        .create(new_user("acc", Role::Accountant))
        .await
        .unwrap();
    let group = SurrealGroupRepository::new(db)
        .create("B21-501")
        .await
        .unwrap();

    let err = service
        .add_student_to_group(&accountant, student.id, group.id)
        .await
        .unwrap_err();
    assert!(matches!(err, BursarError::AuthorizationDenied { .. }));
}

#[tokio::test]
async fn audit_log_is_admin_only_and_ordered() {
    let (service, admin, _ops, db) = setup().await;

    let student = seed_student(&db, "payer").await;
    let semester = SurrealSemesterRepository::new(db.clone())
        .create("2026 Fall")
        .await
        .unwrap();
    let group = SurrealGroupRepository::new(db)
        .create("B21-501")
        .await
        .unwrap();

    service
        .create_transaction(
            &student,
            CreateTransaction {
                semester_id: semester.id,
                amount: 100.0,
            },
        )
        .await
        .unwrap();
    service
        .add_student_to_group(&admin, student.id, group.id)
        .await
        .unwrap();

    let log = service.list_operations(&admin).await.unwrap();
    assert_eq!(log.len(), 2);
    // Oldest first.
    assert_eq!(log[0].category, OperationCategory::Payment);
    assert_eq!(log[1].category, OperationCategory::Group);
    assert!(log[0].created_at <= log[1].created_at);

    let err = service.list_operations(&student).await.unwrap_err();
    assert!(matches!(err, BursarError::AuthorizationDenied { .. }));
}
