//! Integration tests for the user lifecycle orchestrator, backed by
//! an in-memory database.

use bursar_core::error::BursarError;
use bursar_core::models::operation::OperationCategory;
use bursar_core::models::user::{CreateUser, Role, UpdateUser, User};
use bursar_core::repository::{OperationRepository, UserRepository};
use bursar_db::repository::{SurrealOperationRepository, SurrealUserRepository};
use bursar_service::{AuditRecorder, UserDirectory};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

type Directory = UserDirectory<SurrealUserRepository<Db>, SurrealOperationRepository<Db>>;

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

/// In-memory DB plus a directory and a pre-seeded admin actor.
/// Seeding goes straight through the repository, so the audit log
/// starts empty.
async fn setup() -> (Directory, User, SurrealOperationRepository<Db>, Surreal<Db>) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    bursar_db::run_migrations(&db).await.unwrap();

    let users = SurrealUserRepository::new(db.clone());
    let admin = users.create(new_user("root-admin", Role::Admin)).await.unwrap();

    let ops = SurrealOperationRepository::new(db.clone());
    let directory = UserDirectory::new(users, AuditRecorder::new(ops.clone()));

    (directory, admin, ops, db)
}

#[tokio::test]
async fn create_user_writes_audit_and_row() {
    let (directory, admin, ops, _db) = setup().await;

    let created = directory
        .create_user(&admin, new_user("newcomer", Role::Student))
        .await
        .unwrap();
    assert_eq!(created.login, "newcomer");

    let log = ops.list().await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].category, OperationCategory::User);
    assert_eq!(log[0].actor_id, admin.id);
    assert_eq!(
        log[0].comment,
        "Created user Petrov Ivan Sergeevich with role student"
    );
}

#[tokio::test]
async fn duplicate_login_fails_before_audit() {
    let (directory, admin, ops, _db) = setup().await;

    directory
        .create_user(&admin, new_user("taken", Role::Student))
        .await
        .unwrap();

    let err = directory
        .create_user(&admin, new_user("taken", Role::Observer))
        .await
        .unwrap_err();
    assert!(matches!(err, BursarError::AlreadyExists { .. }));

    // Only the successful create left a trace.
    assert_eq!(ops.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn denied_actor_leaves_no_side_effects() {
    let (directory, admin, ops, _db) = setup().await;

    let student = directory
        .create_user(&admin, new_user("student", Role::Student))
        .await
        .unwrap();

    let err = directory
        .create_user(&student, new_user("sneaky", Role::Student))
        .await
        .unwrap_err();
    assert!(matches!(err, BursarError::AuthorizationDenied { .. }));

    // No new row and no new audit record beyond the setup create.
    assert_eq!(ops.list().await.unwrap().len(), 1);
    assert!(matches!(
        directory.profile(&student, student.id).await,
        Ok(_)
    ));
    assert!(directory.list_users(&admin).await.unwrap().len() == 2);
}

#[tokio::test]
async fn edit_audit_captures_premutation_profile() {
    let (directory, admin, ops, _db) = setup().await;

    let bob = directory
        .create_user(&admin, new_user("bob", Role::Student))
        .await
        .unwrap();

    let updated = directory
        .edit_user(
            &admin,
            bob.id,
            UpdateUser {
                name: "Robert".into(),
                surname: "Petrov".into(),
                patronymic: "Sergeevich".into(),
                phone: "+700000000".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Robert");

    let log = ops.list().await.unwrap();
    let edit = log.last().unwrap();
    // The comment names the user as they were before the edit.
    assert_eq!(edit.comment, "Edited user Petrov Ivan Sergeevich");
}

#[tokio::test]
async fn delete_user_audits_then_removes() {
    let (directory, admin, ops, _db) = setup().await;

    let victim = directory
        .create_user(&admin, new_user("victim", Role::Student))
        .await
        .unwrap();

    directory.delete_user(&admin, victim.id).await.unwrap();

    let err = directory.profile(&victim, victim.id).await.unwrap_err();
    assert!(matches!(err, BursarError::NotFound { .. }));

    let log = ops.list().await.unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(
        log[1].comment,
        "Deleted user Petrov Ivan Sergeevich with role student"
    );
}

#[tokio::test]
async fn admin_accounts_can_never_be_deleted() {
    let (directory, admin, ops, _db) = setup().await;

    let second_admin = directory
        .create_user(&admin, new_user("second-admin", Role::Admin))
        .await
        .unwrap();

    let err = directory
        .delete_user(&admin, second_admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, BursarError::AuthorizationDenied { .. }));

    // The guarded attempt left no audit record.
    assert_eq!(ops.list().await.unwrap().len(), 1);
    assert!(directory.profile(&second_admin, second_admin.id).await.is_ok());
}

#[tokio::test]
async fn profile_is_self_access_only() {
    let (directory, admin, _ops, _db) = setup().await;

    let a = directory
        .create_user(&admin, new_user("self-a", Role::Student))
        .await
        .unwrap();
    let b = directory
        .create_user(&admin, new_user("self-b", Role::Student))
        .await
        .unwrap();

    assert_eq!(directory.profile(&a, a.id).await.unwrap().id, a.id);

    // Role does not help here: even the admin cannot use the
    // self-access path for someone else's record.
    let err = directory.profile(&a, b.id).await.unwrap_err();
    assert!(matches!(err, BursarError::AuthorizationDenied { .. }));
    let err = directory.profile(&admin, b.id).await.unwrap_err();
    assert!(matches!(err, BursarError::AuthorizationDenied { .. }));
}

#[tokio::test]
async fn student_reads_follow_the_role_matrix() {
    let (directory, admin, _ops, _db) = setup().await;

    let student = directory
        .create_user(&admin, new_user("stud", Role::Student))
        .await
        .unwrap();
    let observer = directory
        .create_user(&admin, new_user("obs", Role::Observer))
        .await
        .unwrap();
    let accountant = directory
        .create_user(&admin, new_user("acc", Role::Accountant))
        .await
        .unwrap();

    assert!(directory.list_students(&admin).await.is_ok());
    assert!(directory.list_students(&observer).await.is_ok());
    assert!(directory.list_students(&accountant).await.is_ok());
    assert!(matches!(
        directory.list_students(&student).await.unwrap_err(),
        BursarError::AuthorizationDenied { .. }
    ));

    // Fetching a non-student through the student read reports absence.
    let err = directory.get_student(&admin, observer.id).await.unwrap_err();
    assert!(matches!(err, BursarError::NotFound { .. }));
    assert_eq!(
        directory.get_student(&admin, student.id).await.unwrap().id,
        student.id
    );
}

#[tokio::test]
async fn import_skips_bad_rows_and_audits_once() {
    let (directory, admin, ops, _db) = setup().await;

    directory
        .create_user(&admin, new_user("existing", Role::Student))
        .await
        .unwrap();
    let audits_before = ops.list().await.unwrap().len();

    let candidates = vec![
        new_user("import-1", Role::Student),
        new_user("import-2", Role::Student),
        new_user("existing", Role::Student), // duplicate of a stored user
        new_user("import-3", Role::Student),
        new_user("import-4", Role::Student),
    ];

    let outcome = directory.import_users(&admin, candidates).await.unwrap();
    assert_eq!(outcome.created.len(), 4);
    assert_eq!(outcome.skipped, 1);

    // One summary record for the whole batch, not one per row.
    let log = ops.list().await.unwrap();
    assert_eq!(log.len(), audits_before + 1);
    assert_eq!(log.last().unwrap().comment, "Imported 4 users from file");
}

#[tokio::test]
async fn import_requires_admin() {
    let (directory, admin, ops, _db) = setup().await;

    let accountant = directory
        .create_user(&admin, new_user("acc", Role::Accountant))
        .await
        .unwrap();
    let audits_before = ops.list().await.unwrap().len();

    let err = directory
        .import_users(&accountant, vec![new_user("row", Role::Student)])
        .await
        .unwrap_err();
    assert!(matches!(err, BursarError::AuthorizationDenied { .. }));
    assert_eq!(ops.list().await.unwrap().len(), audits_before);
}

#[tokio::test]
async fn edit_of_missing_user_is_not_found_without_audit() {
    let (directory, admin, ops, _db) = setup().await;

    let err = directory
        .edit_user(
            &admin,
            Uuid::new_v4(),
            UpdateUser {
                name: "A".into(),
                surname: "B".into(),
                patronymic: "C".into(),
                phone: "+7".into(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, BursarError::NotFound { .. }));
    assert!(ops.list().await.unwrap().is_empty());
}
