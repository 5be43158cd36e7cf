//! Brand endpoints. Reads are public; mutations are admin-only.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_core::BazaarError;
use bazaar_core::models::brand::{Brand, CreateBrand, UpdateBrand};
use bazaar_core::repository::BrandRepository;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::routes::{created, require_field};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBrandRequest {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct BrandResponse {
    pub brand: Brand,
}

fn slug_conflict() -> ApiError {
    ApiError(BazaarError::AlreadyExists {
        entity: "brand".into(),
    })
}

pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateBrandRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;
    require_field("name", &req.name)?;
    require_field("slug", &req.slug)?;

    // Fast-path check; the unique index closes the race.
    if state.brands().slug_exists(&req.slug, None).await? {
        return Err(slug_conflict());
    }

    let brand = state
        .brands()
        .create(CreateBrand {
            name: req.name,
            slug: req.slug,
        })
        .await?;

    Ok(created(BrandResponse { brand }))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Brand>>, ApiError> {
    Ok(Json(state.brands().list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BrandResponse>, ApiError> {
    let brand = state.brands().get_by_id(id).await?;
    Ok(Json(BrandResponse { brand }))
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateBrandRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
}

pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBrandRequest>,
) -> Result<Json<BrandResponse>, ApiError> {
    auth.require_admin()?;

    if let Some(ref name) = req.name {
        require_field("name", name)?;
    }
    if let Some(ref slug) = req.slug {
        require_field("slug", slug)?;
        // Excluding our own row lets a brand keep its slug.
        if state.brands().slug_exists(slug, Some(id)).await? {
            return Err(slug_conflict());
        }
    }

    let brand = state
        .brands()
        .update(
            id,
            UpdateBrand {
                name: req.name,
                slug: req.slug,
            },
        )
        .await?;

    Ok(Json(BrandResponse { brand }))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    auth.require_admin()?;

    state.brands().get_by_id(id).await?;
    state.brands().delete(id).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}
