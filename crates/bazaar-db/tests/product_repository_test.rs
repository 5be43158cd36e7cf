//! Integration tests for the Product repository (cascading create,
//! soft delete, purge, filters) using in-memory SurrealDB.

use bazaar_core::BazaarError;
use bazaar_core::models::category::CreateCategory;
use bazaar_core::models::product::{CreateProduct, ProductFilter, UpdateProduct};
use bazaar_core::models::role::RoleName;
use bazaar_core::models::specification::SpecificationEntry;
use bazaar_core::models::user::CreateUser;
use bazaar_core::models::vendor::CreateVendor;
use bazaar_core::models::warranty::WarrantyEntry;
use bazaar_core::repository::{
    CategoryRepository, Pagination, ProductRepository, RoleRepository, SpecificationRepository,
    UserRepository, VendorRepository, WarrantyRepository,
};
use bazaar_db::repository::{
    SurrealCategoryRepository, SurrealProductRepository, SurrealRoleRepository,
    SurrealSpecificationRepository, SurrealUserRepository, SurrealVendorRepository,
    SurrealWarrantyRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

struct World {
    db: Surreal<surrealdb::engine::local::Db>,
    vendor_id: Uuid,
    category_id: Uuid,
}

/// Helper: in-memory DB with a vendor (user + profile) and a category.
async fn setup() -> World {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    bazaar_db::run_migrations(&db).await.unwrap();

    let role_repo = SurrealRoleRepository::new(db.clone());
    let vendor_role = role_repo.get_by_name(RoleName::Vendor).await.unwrap();

    let user_repo = SurrealUserRepository::new(db.clone());
    let user = user_repo
        .create(CreateUser {
            first_name: "Sam".into(),
            last_name: "Seller".into(),
            email: "sam@example.com".into(),
            phone: None,
            address: "9 Shop Row".into(),
            profile_pic: None,
            password: "SellSell123!".into(),
            role_id: vendor_role.id,
        })
        .await
        .unwrap();

    let vendor_repo = SurrealVendorRepository::new(db.clone());
    let vendor = vendor_repo
        .create(CreateVendor {
            user_id: user.id,
            shop_name: "Sam's Shop".into(),
            description: None,
        })
        .await
        .unwrap();

    let category_repo = SurrealCategoryRepository::new(db.clone());
    let category = category_repo
        .create(CreateCategory {
            name: "Gadgets".into(),
            slug: "gadgets".into(),
            parent_id: None,
        })
        .await
        .unwrap();

    World {
        db,
        vendor_id: vendor.id,
        category_id: category.id,
    }
}

fn new_product(world: &World, slug: &str) -> CreateProduct {
    CreateProduct {
        vendor_id: world.vendor_id,
        brand_id: None,
        category_id: world.category_id,
        name: "Widget".into(),
        slug: slug.into(),
        short_description: None,
        description: None,
        original_price: 99.5,
        discount: Some(10.0),
        images: None,
        tags: None,
        is_active: None,
    }
}

#[tokio::test]
async fn create_cascades_specifications_and_warranty() {
    let world = setup().await;
    let repo = SurrealProductRepository::new(world.db.clone());

    let product = repo
        .create(
            new_product(&world, "widget"),
            vec![
                SpecificationEntry {
                    key: "color".into(),
                    value: "red".into(),
                },
                SpecificationEntry {
                    key: "weight".into(),
                    value: "1kg".into(),
                },
            ],
            Some(WarrantyEntry {
                warranty_period: "12 months".into(),
                warranty_type: Some("manufacturer".into()),
                details: None,
            }),
        )
        .await
        .unwrap();

    assert_eq!(product.slug, "widget");
    assert_eq!(product.discount, 10.0);
    assert!(product.is_active);

    let spec_repo = SurrealSpecificationRepository::new(world.db.clone());
    let specs = spec_repo.list_by_product(product.id).await.unwrap();
    assert_eq!(specs.len(), 2);
    assert_eq!(specs[0].key, "color");

    let warranty_repo = SurrealWarrantyRepository::new(world.db);
    let warranty = warranty_repo.get_by_product(product.id).await.unwrap();
    assert_eq!(warranty.warranty_period, "12 months");
}

#[tokio::test]
async fn duplicate_slug_rolls_back_the_whole_cascade() {
    let world = setup().await;
    let repo = SurrealProductRepository::new(world.db.clone());

    repo.create(new_product(&world, "widget"), Vec::new(), None)
        .await
        .unwrap();

    // Second create shares the slug; its specification rows must not
    // survive the failed transaction.
    let result = repo
        .create(
            new_product(&world, "widget"),
            vec![SpecificationEntry {
                key: "color".into(),
                value: "blue".into(),
            }],
            None,
        )
        .await;
    assert!(matches!(result, Err(BazaarError::AlreadyExists { .. })));

    #[derive(Debug, surrealdb_types::SurrealValue)]
    struct CountRow {
        total: u64,
    }

    let mut check = world
        .db
        .query("SELECT count() AS total FROM product_specification GROUP ALL")
        .await
        .unwrap();
    let rows: Vec<CountRow> = check.take(0).unwrap();
    let orphans = rows.first().map(|r| r.total).unwrap_or(0);
    assert_eq!(orphans, 0, "failed cascade left orphan specification rows");
}

#[tokio::test]
async fn get_by_slug_and_update() {
    let world = setup().await;
    let repo = SurrealProductRepository::new(world.db);

    let product = repo
        .create(new_product(&world, "gizmo"), Vec::new(), None)
        .await
        .unwrap();

    let by_slug = repo.get_by_slug("gizmo").await.unwrap();
    assert_eq!(by_slug.id, product.id);

    let updated = repo
        .update(
            product.id,
            UpdateProduct {
                original_price: Some(120.0),
                discount: Some(25.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.original_price, 120.0);
    assert_eq!(updated.sale_price(), 90.0);
}

#[tokio::test]
async fn delete_is_soft() {
    let world = setup().await;
    let repo = SurrealProductRepository::new(world.db);

    let product = repo
        .create(new_product(&world, "doohickey"), Vec::new(), None)
        .await
        .unwrap();

    repo.delete(product.id).await.unwrap();

    // Row survives, flagged inactive.
    let fetched = repo.get_by_id(product.id).await.unwrap();
    assert!(!fetched.is_active);
}

#[tokio::test]
async fn purge_removes_product_and_dependents() {
    let world = setup().await;
    let repo = SurrealProductRepository::new(world.db.clone());

    let product = repo
        .create(
            new_product(&world, "ephemeral"),
            vec![SpecificationEntry {
                key: "size".into(),
                value: "L".into(),
            }],
            Some(WarrantyEntry {
                warranty_period: "6 months".into(),
                warranty_type: None,
                details: None,
            }),
        )
        .await
        .unwrap();

    repo.purge(product.id).await.unwrap();

    assert!(matches!(
        repo.get_by_id(product.id).await,
        Err(BazaarError::NotFound { .. })
    ));

    let spec_repo = SurrealSpecificationRepository::new(world.db.clone());
    assert!(spec_repo.list_by_product(product.id).await.unwrap().is_empty());

    let warranty_repo = SurrealWarrantyRepository::new(world.db);
    assert!(matches!(
        warranty_repo.get_by_product(product.id).await,
        Err(BazaarError::NotFound { .. })
    ));
}

#[tokio::test]
async fn list_filters_by_vendor_search_and_price() {
    let world = setup().await;
    let repo = SurrealProductRepository::new(world.db);

    repo.create(
        CreateProduct {
            name: "Cheap Cable".into(),
            original_price: 5.0,
            ..new_product(&world, "cheap-cable")
        },
        Vec::new(),
        None,
    )
    .await
    .unwrap();
    repo.create(
        CreateProduct {
            name: "Premium Cable".into(),
            original_price: 50.0,
            ..new_product(&world, "premium-cable")
        },
        Vec::new(),
        None,
    )
    .await
    .unwrap();

    let all = repo
        .list(
            ProductFilter {
                vendor_id: Some(world.vendor_id),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(all.total, 2);

    let premium = repo
        .list(
            ProductFilter {
                search: Some("Premium".into()),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(premium.items.len(), 1);
    assert_eq!(premium.items[0].slug, "premium-cable");

    let cheap = repo
        .list(
            ProductFilter {
                max_price: Some(10.0),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(cheap.items.len(), 1);
    assert_eq!(cheap.items[0].slug, "cheap-cable");
}

#[tokio::test]
async fn second_warranty_for_a_product_conflicts() {
    let world = setup().await;
    let repo = SurrealProductRepository::new(world.db.clone());

    let product = repo
        .create(new_product(&world, "covered"), Vec::new(), None)
        .await
        .unwrap();

    let warranty_repo = SurrealWarrantyRepository::new(world.db);
    warranty_repo
        .create(bazaar_core::models::warranty::CreateWarranty {
            product_id: product.id,
            warranty_period: "12 months".into(),
            warranty_type: None,
            details: None,
        })
        .await
        .unwrap();

    let result = warranty_repo
        .create(bazaar_core::models::warranty::CreateWarranty {
            product_id: product.id,
            warranty_period: "24 months".into(),
            warranty_type: None,
            details: None,
        })
        .await;
    assert!(matches!(result, Err(BazaarError::AlreadyExists { .. })));
}
