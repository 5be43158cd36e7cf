//! Integration tests for the ownership-resolution chain: the
//! `bazaar-core` policy walking real rows through
//! `SurrealOwnershipLookup`.

use bazaar_core::BazaarError;
use bazaar_core::authz::{self, Principal, ResourceRef};
use bazaar_core::models::category::CreateCategory;
use bazaar_core::models::product::CreateProduct;
use bazaar_core::models::qa::{CreateAnswer, CreateQuestion};
use bazaar_core::models::role::RoleName;
use bazaar_core::models::specification::SpecificationEntry;
use bazaar_core::models::user::CreateUser;
use bazaar_core::models::vendor::{CreateVendor, UpdateVendor};
use bazaar_core::models::warranty::WarrantyEntry;
use bazaar_core::repository::{
    CategoryRepository, ProductRepository, QaRepository, RoleRepository,
    SpecificationRepository, UserRepository, VendorRepository, WarrantyRepository,
};
use bazaar_db::repository::{
    SurrealCategoryRepository, SurrealOwnershipLookup, SurrealProductRepository,
    SurrealQaRepository, SurrealRoleRepository, SurrealSpecificationRepository,
    SurrealUserRepository, SurrealVendorRepository, SurrealWarrantyRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

struct World {
    db: Surreal<surrealdb::engine::local::Db>,
    lookup: SurrealOwnershipLookup<surrealdb::engine::local::Db>,
    owner: Principal,
    other_vendor: Principal,
    admin: Principal,
    vendor_id: Uuid,
    product_id: Uuid,
    spec_id: Uuid,
    warranty_id: Uuid,
    answer_id: Uuid,
}

async fn create_vendor_user(
    db: &Surreal<surrealdb::engine::local::Db>,
    email: &str,
    shop: &str,
) -> (Uuid, Uuid) {
    let role_repo = SurrealRoleRepository::new(db.clone());
    let vendor_role = role_repo.get_by_name(RoleName::Vendor).await.unwrap();

    let user_repo = SurrealUserRepository::new(db.clone());
    let user = user_repo
        .create(CreateUser {
            first_name: "Vendor".into(),
            last_name: "User".into(),
            email: email.into(),
            phone: None,
            address: "1 Shop St".into(),
            profile_pic: None,
            password: "VendorPass1!".into(),
            role_id: vendor_role.id,
        })
        .await
        .unwrap();

    let vendor_repo = SurrealVendorRepository::new(db.clone());
    let vendor = vendor_repo
        .create(CreateVendor {
            user_id: user.id,
            shop_name: shop.into(),
            description: None,
        })
        .await
        .unwrap();

    (user.id, vendor.id)
}

/// Full ownership graph: user → vendor → product → spec/warranty,
/// plus a question answered by the vendor.
async fn setup() -> World {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    bazaar_db::run_migrations(&db).await.unwrap();

    let (owner_user_id, vendor_id) = create_vendor_user(&db, "owner@example.com", "Owner's").await;
    let (other_user_id, _) = create_vendor_user(&db, "other@example.com", "Other's").await;

    let category = SurrealCategoryRepository::new(db.clone())
        .create(CreateCategory {
            name: "Tools".into(),
            slug: "tools".into(),
            parent_id: None,
        })
        .await
        .unwrap();

    let product_repo = SurrealProductRepository::new(db.clone());
    let product = product_repo
        .create(
            CreateProduct {
                vendor_id,
                brand_id: None,
                category_id: category.id,
                name: "Hammer".into(),
                slug: "hammer".into(),
                short_description: None,
                description: None,
                original_price: 25.0,
                discount: None,
                images: None,
                tags: None,
                is_active: None,
            },
            vec![SpecificationEntry {
                key: "material".into(),
                value: "steel".into(),
            }],
            Some(WarrantyEntry {
                warranty_period: "24 months".into(),
                warranty_type: None,
                details: None,
            }),
        )
        .await
        .unwrap();

    let spec = SurrealSpecificationRepository::new(db.clone())
        .list_by_product(product.id)
        .await
        .unwrap()
        .remove(0);
    let warranty = SurrealWarrantyRepository::new(db.clone())
        .get_by_product(product.id)
        .await
        .unwrap();

    let qa_repo = SurrealQaRepository::new(db.clone());
    let question = qa_repo
        .create_question(CreateQuestion {
            product_id: product.id,
            user_id: other_user_id,
            question: "Does it come with nails?".into(),
        })
        .await
        .unwrap();
    let answer = qa_repo
        .create_answer(CreateAnswer {
            question_id: question.id,
            vendor_id,
            answer: "No, nails are sold separately.".into(),
        })
        .await
        .unwrap();

    World {
        lookup: SurrealOwnershipLookup::new(db.clone()),
        db,
        owner: Principal {
            user_id: owner_user_id,
            role: RoleName::Vendor,
        },
        other_vendor: Principal {
            user_id: other_user_id,
            role: RoleName::Vendor,
        },
        admin: Principal {
            user_id: Uuid::new_v4(),
            role: RoleName::Admin,
        },
        vendor_id,
        product_id: product.id,
        spec_id: spec.id,
        warranty_id: warranty.id,
        answer_id: answer.id,
    }
}

#[tokio::test]
async fn owner_may_mutate_along_the_whole_chain() {
    let w = setup().await;
    for resource in [
        ResourceRef::Vendor(w.vendor_id),
        ResourceRef::Product(w.product_id),
        ResourceRef::Specification(w.spec_id),
        ResourceRef::Warranty(w.warranty_id),
        ResourceRef::Answer(w.answer_id),
    ] {
        authz::authorize_mutation(&w.lookup, &w.owner, resource)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn another_vendor_is_forbidden() {
    let w = setup().await;
    for resource in [
        ResourceRef::Product(w.product_id),
        ResourceRef::Specification(w.spec_id),
        ResourceRef::Warranty(w.warranty_id),
        ResourceRef::Answer(w.answer_id),
    ] {
        let err = authz::authorize_mutation(&w.lookup, &w.other_vendor, resource)
            .await
            .unwrap_err();
        assert!(matches!(err, BazaarError::AuthorizationDenied { .. }));
    }
}

#[tokio::test]
async fn admin_bypasses_ownership() {
    let w = setup().await;
    authz::authorize_mutation(&w.lookup, &w.admin, ResourceRef::Product(w.product_id))
        .await
        .unwrap();
}

#[tokio::test]
async fn inactive_vendor_cannot_mutate_its_own_resources() {
    let w = setup().await;
    SurrealVendorRepository::new(w.db.clone())
        .update(
            w.vendor_id,
            UpdateVendor {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = authz::authorize_mutation(&w.lookup, &w.owner, ResourceRef::Product(w.product_id))
        .await
        .unwrap_err();
    assert!(matches!(err, BazaarError::AuthorizationDenied { .. }));
}

#[tokio::test]
async fn broken_chain_is_not_found_not_forbidden() {
    let w = setup().await;

    // Delete the product out from under its specification without
    // touching the spec row itself.
    w.db
        .query("DELETE type::record('product', $id)")
        .bind(("id", w.product_id.to_string()))
        .await
        .unwrap();

    let err = authz::authorize_mutation(
        &w.lookup,
        &w.other_vendor,
        ResourceRef::Specification(w.spec_id),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BazaarError::NotFound { .. }));
}

#[tokio::test]
async fn missing_resource_is_not_found() {
    let w = setup().await;
    let err = authz::authorize_mutation(
        &w.lookup,
        &w.owner,
        ResourceRef::Warranty(Uuid::new_v4()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BazaarError::NotFound { .. }));
}

#[tokio::test]
async fn resolve_walks_answer_to_vendor() {
    let w = setup().await;
    let owner = authz::resolve_owning_vendor(&w.lookup, ResourceRef::Answer(w.answer_id))
        .await
        .unwrap();
    assert_eq!(owner.vendor_id, w.vendor_id);
    assert_eq!(owner.user_id, w.owner.user_id);
}
