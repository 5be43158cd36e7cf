//! Product warranty endpoints. At most one warranty per product;
//! mutation requires ownership of the parent product.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_core::authz::{self, ResourceRef};
use bazaar_core::models::warranty::{CreateWarranty, UpdateWarranty, Warranty};
use bazaar_core::repository::WarrantyRepository;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::routes::{created, require_field};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateWarrantyRequest {
    pub product_id: Uuid,
    pub warranty_period: String,
    pub warranty_type: Option<String>,
    pub details: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WarrantyResponse {
    pub warranty: Warranty,
}

pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateWarrantyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authz::authorize_mutation(
        &state.ownership(),
        &auth.principal,
        ResourceRef::Product(req.product_id),
    )
    .await?;

    require_field("warranty_period", &req.warranty_period)?;

    let warranty = state
        .warranties()
        .create(CreateWarranty {
            product_id: req.product_id,
            warranty_period: req.warranty_period,
            warranty_type: req.warranty_type,
            details: req.details,
        })
        .await?;

    Ok(created(WarrantyResponse { warranty }))
}

pub async fn get_by_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<WarrantyResponse>, ApiError> {
    let warranty = state.warranties().get_by_product(product_id).await?;
    Ok(Json(WarrantyResponse { warranty }))
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateWarrantyRequest {
    pub warranty_period: Option<String>,
    pub warranty_type: Option<Option<String>>,
    pub details: Option<Option<String>>,
}

pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateWarrantyRequest>,
) -> Result<Json<WarrantyResponse>, ApiError> {
    authz::authorize_mutation(
        &state.ownership(),
        &auth.principal,
        ResourceRef::Warranty(id),
    )
    .await?;

    if let Some(ref warranty_period) = req.warranty_period {
        require_field("warranty_period", warranty_period)?;
    }

    let warranty = state
        .warranties()
        .update(
            id,
            UpdateWarranty {
                warranty_period: req.warranty_period,
                warranty_type: req.warranty_type,
                details: req.details,
            },
        )
        .await?;

    Ok(Json(WarrantyResponse { warranty }))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    authz::authorize_mutation(
        &state.ownership(),
        &auth.principal,
        ResourceRef::Warranty(id),
    )
    .await?;

    state.warranties().delete(id).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}
