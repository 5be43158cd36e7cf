//! Integration tests for the Role repository and role resolution
//! using in-memory SurrealDB.

use bazaar_core::models::role::RoleName;
use bazaar_core::models::user::CreateUser;
use bazaar_core::repository::{RoleRepository, UserRepository};
use bazaar_db::repository::{SurrealRoleRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    bazaar_db::run_migrations(&db).await.unwrap();
    db
}

#[tokio::test]
async fn migration_seeds_the_role_hierarchy() {
    let db = setup().await;
    let repo = SurrealRoleRepository::new(db);

    let roles = repo.list().await.unwrap();

    assert_eq!(roles.len(), 3);
    // Ordered by level: most privileged first.
    assert_eq!(roles[0].name, RoleName::Admin);
    assert_eq!(roles[0].level, 0);
    assert_eq!(roles[1].name, RoleName::Vendor);
    assert_eq!(roles[1].level, 1);
    assert_eq!(roles[2].name, RoleName::Customer);
    assert_eq!(roles[2].level, 2);
}

#[tokio::test]
async fn get_role_by_name() {
    let db = setup().await;
    let repo = SurrealRoleRepository::new(db);

    let vendor = repo.get_by_name(RoleName::Vendor).await.unwrap();
    assert_eq!(vendor.name, RoleName::Vendor);
    assert_eq!(vendor.level, 1);

    let by_id = repo.get_by_id(vendor.id).await.unwrap();
    assert_eq!(by_id.name, RoleName::Vendor);
}

#[tokio::test]
async fn resolve_role_joins_user_to_role() {
    let db = setup().await;
    let role_repo = SurrealRoleRepository::new(db.clone());
    let user_repo = SurrealUserRepository::new(db);

    let customer = role_repo.get_by_name(RoleName::Customer).await.unwrap();
    let user = user_repo
        .create(CreateUser {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: None,
            address: "1 Analytical Way".into(),
            profile_pic: None,
            password: "EnginePass42!".into(),
            role_id: customer.id,
        })
        .await
        .unwrap();

    let resolved = role_repo.resolve_role(user.id).await.unwrap();
    assert_eq!(resolved.name, RoleName::Customer);
    assert_eq!(resolved.level, 2);
}

#[tokio::test]
async fn resolve_role_for_unknown_user_is_not_found() {
    let db = setup().await;
    let repo = SurrealRoleRepository::new(db);

    let result = repo.resolve_role(uuid::Uuid::new_v4()).await;
    assert!(matches!(
        result,
        Err(bazaar_core::BazaarError::NotFound { .. })
    ));
}
