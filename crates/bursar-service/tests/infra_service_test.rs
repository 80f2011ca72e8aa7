//! Integration tests for the group/semester lifecycle orchestrator.

use bursar_core::error::BursarError;
use bursar_core::models::operation::OperationCategory;
use bursar_core::models::user::{CreateUser, Role, User};
use bursar_core::repository::{OperationRepository, UserRepository};
use bursar_db::repository::{
    SurrealGroupRepository, SurrealOperationRepository, SurrealSemesterRepository,
    SurrealUserRepository,
};
use bursar_service::{AuditRecorder, InfraService};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

type Infra = InfraService<
    SurrealGroupRepository<Db>,
    SurrealSemesterRepository<Db>,
    SurrealUserRepository<Db>,
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

async fn setup() -> (Infra, User, SurrealOperationRepository<Db>, Surreal<Db>) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    bursar_db::run_migrations(&db).await.unwrap();

    let users = SurrealUserRepository::new(db.clone());
    let admin = users.create(new_user("root-admin", Role::Admin)).await.unwrap();

    let ops = SurrealOperationRepository::new(db.clone());
    let infra = InfraService::new(
        SurrealGroupRepository::new(db.clone()),
        SurrealSemesterRepository::new(db.clone()),
        users,
        AuditRecorder::new(ops.clone()),
    );

    (infra, admin, ops, db)
}

#[tokio::test]
async fn group_lifecycle_with_audit_trail() {
    let (infra, admin, ops, _db) = setup().await;

    let group = infra.create_group(&admin, "B21-501").await.unwrap();
    assert_eq!(group.name, "B21-501");

    // Same name again: rejected before any audit write.
    let err = infra.create_group(&admin, "B21-501").await.unwrap_err();
    assert!(matches!(err, BursarError::AlreadyExists { .. }));
    assert_eq!(ops.list().await.unwrap().len(), 1);

    let renamed = infra.rename_group(&admin, group.id, "B21-502").await.unwrap();
    assert_eq!(renamed.name, "B21-502");

    infra.delete_group(&admin, group.id).await.unwrap();
    assert!(matches!(
        infra.get_group(&admin, group.id).await.unwrap_err(),
        BursarError::NotFound { .. }
    ));
    assert!(infra.list_groups(&admin).await.unwrap().is_empty());

    let log = ops.list().await.unwrap();
    assert_eq!(log.len(), 3);
    assert!(log.iter().all(|op| op.category == OperationCategory::Group));
    assert_eq!(log[0].comment, "Created group B21-501");
    // The rename comment carries both the old and the new name.
    assert_eq!(log[1].comment, "Renamed group B21-501 to B21-502");
    // The delete comment carries the name the group had at deletion.
    assert_eq!(log[2].comment, "Deleted group B21-502");
}

#[tokio::test]
async fn rename_group_to_taken_name_is_rejected() {
    let (infra, admin, ops, _db) = setup().await;

    let g1 = infra.create_group(&admin, "B21-501").await.unwrap();
    infra.create_group(&admin, "B21-502").await.unwrap();
    let audits_before = ops.list().await.unwrap().len();

    let err = infra.rename_group(&admin, g1.id, "B21-502").await.unwrap_err();
    assert!(matches!(err, BursarError::AlreadyExists { .. }));
    assert_eq!(ops.list().await.unwrap().len(), audits_before);

    // Renaming to its own current name is not a collision.
    assert!(infra.rename_group(&admin, g1.id, "B21-501").await.is_ok());
}

#[tokio::test]
async fn delete_group_detaches_every_member_first() {
    let (infra, admin, _ops, db) = setup().await;
    let users = SurrealUserRepository::new(db);

    let group = infra.create_group(&admin, "B21-501").await.unwrap();
    let mut members = Vec::new();
    for i in 0..3 {
        let u = users
            .create(new_user(&format!("member-{i}"), Role::Student))
            .await
            .unwrap();
        users.set_group(u.id, Some(group.id)).await.unwrap();
        members.push(u);
    }

    infra.delete_group(&admin, group.id).await.unwrap();

    for member in members {
        let reread = users.get_by_id(member.id).await.unwrap();
        assert_eq!(reread.group_id, None);
    }
}

#[tokio::test]
async fn group_mutations_require_admin() {
    let (infra, admin, ops, db) = setup().await;
    let users = SurrealUserRepository::new(db);

    let accountant = users.create(new_user("acc", Role::Accountant)).await.unwrap();
    let observer = users.create(new_user("obs", Role::Observer)).await.unwrap();

    let err = infra.create_group(&accountant, "B21-501").await.unwrap_err();
    assert!(matches!(err, BursarError::AuthorizationDenied { .. }));
    assert!(ops.list().await.unwrap().is_empty());

    // Reads: accountant yes, observer no.
    assert!(infra.list_groups(&accountant).await.is_ok());
    assert!(matches!(
        infra.list_groups(&observer).await.unwrap_err(),
        BursarError::AuthorizationDenied { .. }
    ));
}

#[tokio::test]
async fn semester_lifecycle_with_audit_trail() {
    let (infra, admin, ops, _db) = setup().await;

    let semester = infra.create_semester(&admin, "2026 Fall").await.unwrap();

    let err = infra.create_semester(&admin, "2026 Fall").await.unwrap_err();
    assert!(matches!(err, BursarError::AlreadyExists { .. }));

    infra
        .rename_semester(&admin, semester.id, "2026 Autumn")
        .await
        .unwrap();
    infra.delete_semester(&admin, semester.id).await.unwrap();

    let log = ops.list().await.unwrap();
    assert_eq!(log.len(), 3);
    assert!(log.iter().all(|op| op.category == OperationCategory::Semester));
    assert_eq!(log[1].comment, "Renamed semester 2026 Fall to 2026 Autumn");
    assert_eq!(log[2].comment, "Deleted semester 2026 Autumn");
}

#[tokio::test]
async fn semester_listing_is_public() {
    let (infra, admin, _ops, _db) = setup().await;

    infra.create_semester(&admin, "2026 Fall").await.unwrap();
    infra.create_semester(&admin, "2027 Spring").await.unwrap();

    // No actor involved at all.
    let all = infra.list_semesters().await.unwrap();
    assert_eq!(all.len(), 2);
}
