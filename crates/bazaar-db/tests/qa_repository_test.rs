//! Integration tests for the Q&A repository using in-memory
//! SurrealDB.

use bazaar_core::BazaarError;
use bazaar_core::models::category::CreateCategory;
use bazaar_core::models::product::CreateProduct;
use bazaar_core::models::qa::{CreateAnswer, CreateQuestion};
use bazaar_core::models::role::RoleName;
use bazaar_core::models::user::CreateUser;
use bazaar_core::models::vendor::CreateVendor;
use bazaar_core::repository::{
    CategoryRepository, ProductRepository, QaRepository, RoleRepository, UserRepository,
    VendorRepository,
};
use bazaar_db::repository::{
    SurrealCategoryRepository, SurrealProductRepository, SurrealQaRepository,
    SurrealRoleRepository, SurrealUserRepository, SurrealVendorRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

struct World {
    db: Surreal<surrealdb::engine::local::Db>,
    customer_id: Uuid,
    vendor_id: Uuid,
    product_id: Uuid,
}

async fn setup() -> World {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    bazaar_db::run_migrations(&db).await.unwrap();

    let role_repo = SurrealRoleRepository::new(db.clone());
    let vendor_role = role_repo.get_by_name(RoleName::Vendor).await.unwrap();
    let customer_role = role_repo.get_by_name(RoleName::Customer).await.unwrap();

    let user_repo = SurrealUserRepository::new(db.clone());
    let seller = user_repo
        .create(CreateUser {
            first_name: "Sally".into(),
            last_name: "Seller".into(),
            email: "sally@example.com".into(),
            phone: None,
            address: "2 Shop St".into(),
            profile_pic: None,
            password: "SellerPass1!".into(),
            role_id: vendor_role.id,
        })
        .await
        .unwrap();
    let customer = user_repo
        .create(CreateUser {
            first_name: "Carl".into(),
            last_name: "Customer".into(),
            email: "carl@example.com".into(),
            phone: None,
            address: "3 Buyer Ave".into(),
            profile_pic: None,
            password: "BuyerPass1!".into(),
            role_id: customer_role.id,
        })
        .await
        .unwrap();

    let vendor = SurrealVendorRepository::new(db.clone())
        .create(CreateVendor {
            user_id: seller.id,
            shop_name: "Sally's".into(),
            description: None,
        })
        .await
        .unwrap();

    let category = SurrealCategoryRepository::new(db.clone())
        .create(CreateCategory {
            name: "Audio".into(),
            slug: "audio".into(),
            parent_id: None,
        })
        .await
        .unwrap();

    let product = SurrealProductRepository::new(db.clone())
        .create(
            CreateProduct {
                vendor_id: vendor.id,
                brand_id: None,
                category_id: category.id,
                name: "Headphones".into(),
                slug: "headphones".into(),
                short_description: None,
                description: None,
                original_price: 79.0,
                discount: None,
                images: None,
                tags: None,
                is_active: None,
            },
            Vec::new(),
            None,
        )
        .await
        .unwrap();

    World {
        db,
        customer_id: customer.id,
        vendor_id: vendor.id,
        product_id: product.id,
    }
}

#[tokio::test]
async fn ask_and_answer_a_question() {
    let w = setup().await;
    let repo = SurrealQaRepository::new(w.db);

    let question = repo
        .create_question(CreateQuestion {
            product_id: w.product_id,
            user_id: w.customer_id,
            question: "Are these wireless?".into(),
        })
        .await
        .unwrap();
    assert_eq!(question.product_id, w.product_id);

    let answer = repo
        .create_answer(CreateAnswer {
            question_id: question.id,
            vendor_id: w.vendor_id,
            answer: "Yes, Bluetooth 5.3.".into(),
        })
        .await
        .unwrap();
    assert_eq!(answer.question_id, question.id);

    let answers = repo.list_answers(question.id).await.unwrap();
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].answer, "Yes, Bluetooth 5.3.");
}

#[tokio::test]
async fn a_vendor_may_answer_a_question_only_once() {
    let w = setup().await;
    let repo = SurrealQaRepository::new(w.db);

    let question = repo
        .create_question(CreateQuestion {
            product_id: w.product_id,
            user_id: w.customer_id,
            question: "Battery life?".into(),
        })
        .await
        .unwrap();

    repo.create_answer(CreateAnswer {
        question_id: question.id,
        vendor_id: w.vendor_id,
        answer: "About 30 hours.".into(),
    })
    .await
    .unwrap();

    let result = repo
        .create_answer(CreateAnswer {
            question_id: question.id,
            vendor_id: w.vendor_id,
            answer: "Let me correct that.".into(),
        })
        .await;
    assert!(matches!(result, Err(BazaarError::AlreadyExists { .. })));
}

#[tokio::test]
async fn product_qa_view_groups_answers_under_questions() {
    let w = setup().await;
    let repo = SurrealQaRepository::new(w.db);

    let q1 = repo
        .create_question(CreateQuestion {
            product_id: w.product_id,
            user_id: w.customer_id,
            question: "Is there a case included?".into(),
        })
        .await
        .unwrap();
    let q2 = repo
        .create_question(CreateQuestion {
            product_id: w.product_id,
            user_id: w.customer_id,
            question: "What colours exist?".into(),
        })
        .await
        .unwrap();

    repo.create_answer(CreateAnswer {
        question_id: q1.id,
        vendor_id: w.vendor_id,
        answer: "Yes, a hard case.".into(),
    })
    .await
    .unwrap();

    let qa = repo.list_by_product(w.product_id).await.unwrap();
    assert_eq!(qa.len(), 2);

    let answered = qa.iter().find(|q| q.question.id == q1.id).unwrap();
    assert_eq!(answered.answers.len(), 1);
    let unanswered = qa.iter().find(|q| q.question.id == q2.id).unwrap();
    assert!(unanswered.answers.is_empty());

    let get = repo.get_question(q2.id).await.unwrap();
    assert_eq!(get.question, "What colours exist?");
}
