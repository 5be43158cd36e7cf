//! Vendor profile endpoints.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_core::authz::{self, ResourceRef};
use bazaar_core::models::vendor::{CreateVendor, UpdateVendor, Vendor};
use bazaar_core::repository::{Pagination, UserRepository, VendorRepository};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::routes::{created, require_field, PageResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateVendorRequest {
    /// Defaults to the caller; only admins may create a profile for
    /// someone else.
    pub user_id: Option<Uuid>,
    pub shop_name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VendorResponse {
    pub vendor: Vendor,
}

pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateVendorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_field("shop_name", &req.shop_name)?;

    let user_id = req.user_id.unwrap_or(auth.principal.user_id);
    if user_id != auth.principal.user_id {
        auth.require_admin()?;
    }

    // The target account must exist before a shop hangs off it.
    state.users().get_by_id(user_id).await?;

    let vendor = state
        .vendors()
        .create(CreateVendor {
            user_id,
            shop_name: req.shop_name,
            description: req.description,
        })
        .await?;

    Ok(created(VendorResponse { vendor }))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PageResponse<Vendor>>, ApiError> {
    let default = Pagination::default();
    let page = state
        .vendors()
        .list(Pagination {
            offset: query.offset.unwrap_or(default.offset),
            limit: query.limit.unwrap_or(default.limit),
        })
        .await?;

    Ok(Json(page.into()))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VendorResponse>, ApiError> {
    let vendor = state.vendors().get_by_id(id).await?;
    Ok(Json(VendorResponse { vendor }))
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateVendorRequest {
    pub shop_name: Option<String>,
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateVendorRequest>,
) -> Result<Json<VendorResponse>, ApiError> {
    authz::authorize_mutation(&state.ownership(), &auth.principal, ResourceRef::Vendor(id))
        .await?;

    if let Some(ref shop_name) = req.shop_name {
        require_field("shop_name", shop_name)?;
    }
    // Reactivation cannot go through the ownership check (an inactive
    // vendor fails it), so flipping is_active is admin-only.
    if req.is_active.is_some() {
        auth.require_admin()?;
    }

    let vendor = state
        .vendors()
        .update(
            id,
            UpdateVendor {
                shop_name: req.shop_name,
                description: req.description,
                is_active: req.is_active,
            },
        )
        .await?;

    Ok(Json(VendorResponse { vendor }))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    authz::authorize_mutation(&state.ownership(), &auth.principal, ResourceRef::Vendor(id))
        .await?;

    state.vendors().delete(id).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}
