//! Integration tests for the User repository using in-memory
//! SurrealDB.

use bazaar_core::BazaarError;
use bazaar_core::models::role::RoleName;
use bazaar_core::models::user::{CreateUser, UpdateUser};
use bazaar_core::repository::{Pagination, RoleRepository, UserFilter, UserRepository};
use bazaar_db::repository::{SurrealRoleRepository, SurrealUserRepository, verify_password};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB, run migrations, fetch the default
/// customer role id.
async fn setup() -> (Surreal<surrealdb::engine::local::Db>, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    bazaar_db::run_migrations(&db).await.unwrap();

    let role_repo = SurrealRoleRepository::new(db.clone());
    let customer = role_repo.get_by_name(RoleName::Customer).await.unwrap();

    (db, customer.id)
}

fn new_user(email: &str, role_id: Uuid) -> CreateUser {
    CreateUser {
        first_name: "Test".into(),
        last_name: "User".into(),
        email: email.into(),
        phone: None,
        address: "42 Market St".into(),
        profile_pic: None,
        password: "SuperSecret123!".into(),
        role_id,
    }
}

#[tokio::test]
async fn create_and_get_user() {
    let (db, role_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(CreateUser {
            first_name: "Alice".into(),
            last_name: "Hart".into(),
            phone: Some("+15550100".into()),
            ..new_user("alice@example.com", role_id)
        })
        .await
        .unwrap();

    assert_eq!(user.first_name, "Alice");
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.role_id, role_id);
    assert!(user.is_active);

    // Password should be hashed, not stored in plaintext.
    assert_ne!(user.password_hash, "SuperSecret123!");
    assert!(user.password_hash.starts_with("$argon2id$"));

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.id, user.id);
    assert_eq!(fetched.phone.as_deref(), Some("+15550100"));
}

#[tokio::test]
async fn password_verification() {
    let (db, role_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(new_user("bob@example.com", role_id))
        .await
        .unwrap();

    assert!(verify_password("SuperSecret123!", &user.password_hash, None).unwrap());
    assert!(!verify_password("WrongPassword", &user.password_hash, None).unwrap());
}

#[tokio::test]
async fn password_with_pepper() {
    let (db, role_id) = setup().await;
    let pepper = "server-secret-pepper".to_string();
    let repo = SurrealUserRepository::with_pepper(db, pepper.clone());

    let user = repo
        .create(new_user("carol@example.com", role_id))
        .await
        .unwrap();

    assert!(verify_password("SuperSecret123!", &user.password_hash, Some(&pepper)).unwrap());
    assert!(!verify_password("SuperSecret123!", &user.password_hash, None).unwrap());
}

#[tokio::test]
async fn get_user_by_email() {
    let (db, role_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(new_user("dave@example.com", role_id))
        .await
        .unwrap();

    let fetched = repo.get_by_email("dave@example.com").await.unwrap();
    assert_eq!(fetched.id, user.id);
}

#[tokio::test]
async fn update_user() {
    let (db, role_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(new_user("frank@example.com", role_id))
        .await
        .unwrap();

    let updated = repo
        .update(
            user.id,
            UpdateUser {
                first_name: Some("Franklin".into()),
                phone: Some(Some("+15550111".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.first_name, "Franklin");
    assert_eq!(updated.phone.as_deref(), Some("+15550111"));
    assert_eq!(updated.email, "frank@example.com"); // unchanged

    // Clearing the phone again.
    let cleared = repo
        .update(
            user.id,
            UpdateUser {
                phone: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.phone, None);
}

#[tokio::test]
async fn set_password_rehashes() {
    let (db, role_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(new_user("grace@example.com", role_id))
        .await
        .unwrap();

    repo.set_password(user.id, "NewSecret456!").await.unwrap();

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert!(verify_password("NewSecret456!", &fetched.password_hash, None).unwrap());
    assert!(!verify_password("SuperSecret123!", &fetched.password_hash, None).unwrap());
}

#[tokio::test]
async fn deactivate_is_a_soft_delete() {
    let (db, role_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(new_user("henry@example.com", role_id))
        .await
        .unwrap();

    repo.deactivate(user.id).await.unwrap();

    // User should still exist but inactive.
    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert!(!fetched.is_active);
}

#[tokio::test]
async fn list_users_with_pagination_and_search() {
    let (db, role_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    for i in 0..5 {
        repo.create(new_user(&format!("user-{i}@example.com"), role_id))
            .await
            .unwrap();
    }
    repo.create(CreateUser {
        first_name: "Zelda".into(),
        ..new_user("zelda@example.com", role_id)
    })
    .await
    .unwrap();

    let page1 = repo
        .list(
            UserFilter::default(),
            Pagination {
                offset: 0,
                limit: 4,
            },
        )
        .await
        .unwrap();
    assert_eq!(page1.items.len(), 4);
    assert_eq!(page1.total, 6);

    let found = repo
        .list(
            UserFilter {
                search: Some("zelda".into()),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].first_name, "Zelda");
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let (db, role_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(new_user("same@example.com", role_id))
        .await
        .unwrap();

    let result = repo.create(new_user("same@example.com", role_id)).await;
    assert!(matches!(
        result,
        Err(BazaarError::AlreadyExists { .. })
    ));
}

#[tokio::test]
async fn duplicate_phone_is_a_conflict() {
    let (db, role_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(CreateUser {
        phone: Some("+15550123".into()),
        ..new_user("first@example.com", role_id)
    })
    .await
    .unwrap();

    let result = repo
        .create(CreateUser {
            phone: Some("+15550123".into()),
            ..new_user("second@example.com", role_id)
        })
        .await;
    assert!(matches!(
        result,
        Err(BazaarError::AlreadyExists { .. })
    ));
}
