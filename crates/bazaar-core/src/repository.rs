//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Slug-carrying catalog entities
//! (brand, category, product) expose a `slug_exists` fast-path check;
//! the database unique index remains the final authority on races.

use std::future::Future;

use uuid::Uuid;

use crate::error::BazaarResult;
use crate::models::{
    brand::{Brand, CreateBrand, UpdateBrand},
    category::{Category, CreateCategory, UpdateCategory},
    product::{CreateProduct, Product, ProductFilter, UpdateProduct},
    qa::{Answer, CreateAnswer, CreateQuestion, Question, QuestionWithAnswers},
    role::{ResolvedRole, Role, RoleName},
    specification::{CreateSpecification, Specification, SpecificationEntry, UpdateSpecification},
    user::{CreateUser, UpdateUser, User},
    vendor::{CreateVendor, UpdateVendor, Vendor},
    warranty::{CreateWarranty, UpdateWarranty, Warranty, WarrantyEntry},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 20,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

pub trait RoleRepository: Send + Sync {
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = BazaarResult<Role>> + Send;
    fn get_by_name(&self, name: RoleName) -> impl Future<Output = BazaarResult<Role>> + Send;
    fn list(&self) -> impl Future<Output = BazaarResult<Vec<Role>>> + Send;

    /// Resolve the role of a user by joining user → role.
    ///
    /// `NotFound` means the user or its role row is missing — an
    /// account-data inconsistency the caller treats as unauthorized.
    fn resolve_role(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = BazaarResult<ResolvedRole>> + Send;
}

/// Query filters for user listings.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Substring match on first name, last name, email, or phone.
    pub search: Option<String>,
    pub role_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = BazaarResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = BazaarResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = BazaarResult<User>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = BazaarResult<User>> + Send;
    /// Hash and store a new password for the user.
    fn set_password(
        &self,
        id: Uuid,
        password: &str,
    ) -> impl Future<Output = BazaarResult<()>> + Send;
    /// Soft-delete: sets `is_active` to false.
    fn deactivate(&self, id: Uuid) -> impl Future<Output = BazaarResult<()>> + Send;
    fn list(
        &self,
        filter: UserFilter,
        pagination: Pagination,
    ) -> impl Future<Output = BazaarResult<PaginatedResult<User>>> + Send;
}

pub trait VendorRepository: Send + Sync {
    /// Fails with `AlreadyExists` if the user already has a vendor
    /// profile.
    fn create(&self, input: CreateVendor) -> impl Future<Output = BazaarResult<Vendor>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = BazaarResult<Vendor>> + Send;
    fn get_by_user(&self, user_id: Uuid) -> impl Future<Output = BazaarResult<Vendor>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateVendor,
    ) -> impl Future<Output = BazaarResult<Vendor>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = BazaarResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = BazaarResult<PaginatedResult<Vendor>>> + Send;
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

pub trait BrandRepository: Send + Sync {
    fn create(&self, input: CreateBrand) -> impl Future<Output = BazaarResult<Brand>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = BazaarResult<Brand>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateBrand,
    ) -> impl Future<Output = BazaarResult<Brand>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = BazaarResult<()>> + Send;
    fn list(&self) -> impl Future<Output = BazaarResult<Vec<Brand>>> + Send;
    fn slug_exists(
        &self,
        slug: &str,
        exclude_id: Option<Uuid>,
    ) -> impl Future<Output = BazaarResult<bool>> + Send;
}

pub trait CategoryRepository: Send + Sync {
    fn create(
        &self,
        input: CreateCategory,
    ) -> impl Future<Output = BazaarResult<Category>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = BazaarResult<Category>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateCategory,
    ) -> impl Future<Output = BazaarResult<Category>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = BazaarResult<()>> + Send;
    /// All categories ordered by name; input to the tree builder.
    fn list_all(&self) -> impl Future<Output = BazaarResult<Vec<Category>>> + Send;
    /// Number of categories whose `parent_id` is `id` (delete guard).
    fn count_children(&self, id: Uuid) -> impl Future<Output = BazaarResult<u64>> + Send;
    fn slug_exists(
        &self,
        slug: &str,
        exclude_id: Option<Uuid>,
    ) -> impl Future<Output = BazaarResult<bool>> + Send;
}

pub trait ProductRepository: Send + Sync {
    /// Create a product together with its specification and warranty
    /// rows in a single transaction — all rows land or none do.
    fn create(
        &self,
        input: CreateProduct,
        specifications: Vec<SpecificationEntry>,
        warranty: Option<WarrantyEntry>,
    ) -> impl Future<Output = BazaarResult<Product>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = BazaarResult<Product>> + Send;
    fn get_by_slug(&self, slug: &str) -> impl Future<Output = BazaarResult<Product>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateProduct,
    ) -> impl Future<Output = BazaarResult<Product>> + Send;
    /// Soft-delete: sets `is_active` to false.
    fn delete(&self, id: Uuid) -> impl Future<Output = BazaarResult<()>> + Send;
    /// Hard-delete the product and all dependent rows
    /// (specifications, warranty, Q&A) in a single transaction.
    fn purge(&self, id: Uuid) -> impl Future<Output = BazaarResult<()>> + Send;
    fn list(
        &self,
        filter: ProductFilter,
        pagination: Pagination,
    ) -> impl Future<Output = BazaarResult<PaginatedResult<Product>>> + Send;
    fn slug_exists(
        &self,
        slug: &str,
        exclude_id: Option<Uuid>,
    ) -> impl Future<Output = BazaarResult<bool>> + Send;
}

// ---------------------------------------------------------------------------
// Product children
// ---------------------------------------------------------------------------

pub trait SpecificationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateSpecification,
    ) -> impl Future<Output = BazaarResult<Specification>> + Send;
    /// Insert several specifications for one product atomically.
    fn create_bulk(
        &self,
        product_id: Uuid,
        entries: Vec<SpecificationEntry>,
    ) -> impl Future<Output = BazaarResult<Vec<Specification>>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = BazaarResult<Specification>> + Send;
    fn list_by_product(
        &self,
        product_id: Uuid,
    ) -> impl Future<Output = BazaarResult<Vec<Specification>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateSpecification,
    ) -> impl Future<Output = BazaarResult<Specification>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = BazaarResult<()>> + Send;
}

pub trait WarrantyRepository: Send + Sync {
    /// Fails with `AlreadyExists` if the product already has a
    /// warranty.
    fn create(&self, input: CreateWarranty) -> impl Future<Output = BazaarResult<Warranty>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = BazaarResult<Warranty>> + Send;
    fn get_by_product(
        &self,
        product_id: Uuid,
    ) -> impl Future<Output = BazaarResult<Warranty>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateWarranty,
    ) -> impl Future<Output = BazaarResult<Warranty>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = BazaarResult<()>> + Send;
}

pub trait QaRepository: Send + Sync {
    fn create_question(
        &self,
        input: CreateQuestion,
    ) -> impl Future<Output = BazaarResult<Question>> + Send;
    fn get_question(&self, id: Uuid) -> impl Future<Output = BazaarResult<Question>> + Send;
    /// Fails with `AlreadyExists` if this vendor already answered the
    /// question.
    fn create_answer(
        &self,
        input: CreateAnswer,
    ) -> impl Future<Output = BazaarResult<Answer>> + Send;
    fn list_answers(
        &self,
        question_id: Uuid,
    ) -> impl Future<Output = BazaarResult<Vec<Answer>>> + Send;
    /// Questions for a product, newest first, each with its answers.
    fn list_by_product(
        &self,
        product_id: Uuid,
    ) -> impl Future<Output = BazaarResult<Vec<QuestionWithAnswers>>> + Send;
}
