//! Product endpoints. Creation cascades specification and warranty
//! rows inside one transaction; deletion is soft.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_core::BazaarError;
use bazaar_core::authz::{self, ResourceRef};
use bazaar_core::models::product::{CreateProduct, Product, ProductFilter, UpdateProduct};
use bazaar_core::models::specification::SpecificationEntry;
use bazaar_core::models::warranty::WarrantyEntry;
use bazaar_core::repository::{
    BrandRepository, CategoryRepository, Pagination, ProductRepository,
};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::routes::{created, require_field, PageResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SpecificationPayload {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct WarrantyPayload {
    pub warranty_period: String,
    pub warranty_type: Option<String>,
    pub details: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub vendor_id: Uuid,
    pub brand_id: Option<Uuid>,
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub original_price: f64,
    pub discount: Option<f64>,
    pub images: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub specifications: Vec<SpecificationPayload>,
    pub warranty: Option<WarrantyPayload>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub product: Product,
}

fn slug_conflict() -> ApiError {
    ApiError(BazaarError::AlreadyExists {
        entity: "product".into(),
    })
}

fn check_price(original_price: f64) -> Result<(), ApiError> {
    if original_price <= 0.0 {
        return Err(ApiError::validation("original_price must be positive"));
    }
    Ok(())
}

fn check_discount(discount: f64) -> Result<(), ApiError> {
    if !(0.0..=100.0).contains(&discount) {
        return Err(ApiError::validation("discount must be between 0 and 100"));
    }
    Ok(())
}

pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // The caller must own the vendor the product is listed under.
    authz::authorize_mutation(
        &state.ownership(),
        &auth.principal,
        ResourceRef::Vendor(req.vendor_id),
    )
    .await?;

    require_field("name", &req.name)?;
    require_field("slug", &req.slug)?;
    check_price(req.original_price)?;
    if let Some(discount) = req.discount {
        check_discount(discount)?;
    }
    for spec in &req.specifications {
        require_field("specification key", &spec.key)?;
    }

    // Referenced rows must exist; dangling ids are 404s.
    state.categories().get_by_id(req.category_id).await?;
    if let Some(brand_id) = req.brand_id {
        state.brands().get_by_id(brand_id).await?;
    }

    if state.products().slug_exists(&req.slug, None).await? {
        return Err(slug_conflict());
    }

    let specifications = req
        .specifications
        .into_iter()
        .map(|s| SpecificationEntry {
            key: s.key,
            value: s.value,
        })
        .collect();
    let warranty = req.warranty.map(|w| WarrantyEntry {
        warranty_period: w.warranty_period,
        warranty_type: w.warranty_type,
        details: w.details,
    });

    let product = state
        .products()
        .create(
            CreateProduct {
                vendor_id: req.vendor_id,
                brand_id: req.brand_id,
                category_id: req.category_id,
                name: req.name,
                slug: req.slug,
                short_description: req.short_description,
                description: req.description,
                original_price: req.original_price,
                discount: req.discount,
                images: req.images,
                tags: req.tags,
                is_active: req.is_active,
            },
            specifications,
            warranty,
        )
        .await?;

    Ok(created(ProductResponse { product }))
}

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    pub vendor_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub is_active: Option<bool>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<PageResponse<Product>>, ApiError> {
    let default = Pagination::default();
    let page = state
        .products()
        .list(
            ProductFilter {
                vendor_id: query.vendor_id,
                category_id: query.category_id,
                brand_id: query.brand_id,
                search: query.search,
                min_price: query.min_price,
                max_price: query.max_price,
                is_active: query.is_active,
            },
            Pagination {
                offset: query.offset.unwrap_or(default.offset),
                limit: query.limit.unwrap_or(default.limit),
            },
        )
        .await?;

    Ok(Json(page.into()))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.products().get_by_id(id).await?;
    Ok(Json(ProductResponse { product }))
}

pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.products().get_by_slug(&slug).await?;
    Ok(Json(ProductResponse { product }))
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateProductRequest {
    pub brand_id: Option<Option<Uuid>>,
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub short_description: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub original_price: Option<f64>,
    pub discount: Option<f64>,
    pub images: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    authz::authorize_mutation(&state.ownership(), &auth.principal, ResourceRef::Product(id))
        .await?;

    if let Some(ref name) = req.name {
        require_field("name", name)?;
    }
    if let Some(original_price) = req.original_price {
        check_price(original_price)?;
    }
    if let Some(discount) = req.discount {
        check_discount(discount)?;
    }
    if let Some(category_id) = req.category_id {
        state.categories().get_by_id(category_id).await?;
    }
    if let Some(Some(brand_id)) = req.brand_id {
        state.brands().get_by_id(brand_id).await?;
    }
    if let Some(ref slug) = req.slug {
        require_field("slug", slug)?;
        if state.products().slug_exists(slug, Some(id)).await? {
            return Err(slug_conflict());
        }
    }

    let product = state
        .products()
        .update(
            id,
            UpdateProduct {
                brand_id: req.brand_id,
                category_id: req.category_id,
                name: req.name,
                slug: req.slug,
                short_description: req.short_description,
                description: req.description,
                original_price: req.original_price,
                discount: req.discount,
                images: req.images,
                tags: req.tags,
                is_active: req.is_active,
            },
        )
        .await?;

    Ok(Json(ProductResponse { product }))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    authz::authorize_mutation(&state.ownership(), &auth.principal, ResourceRef::Product(id))
        .await?;

    state.products().delete(id).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}
