//! Product specification endpoints. Mutation requires ownership of
//! the parent product.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_core::authz::{self, ResourceRef};
use bazaar_core::models::specification::{
    CreateSpecification, Specification, SpecificationEntry, UpdateSpecification,
};
use bazaar_core::repository::SpecificationRepository;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::routes::{created, require_field};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSpecificationRequest {
    pub product_id: Uuid,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct SpecificationResponse {
    pub specification: Specification,
}

pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateSpecificationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authz::authorize_mutation(
        &state.ownership(),
        &auth.principal,
        ResourceRef::Product(req.product_id),
    )
    .await?;

    require_field("key", &req.key)?;

    let specification = state
        .specifications()
        .create(CreateSpecification {
            product_id: req.product_id,
            key: req.key,
            value: req.value,
        })
        .await?;

    Ok(created(SpecificationResponse { specification }))
}

#[derive(Debug, Deserialize)]
pub struct BulkPayload {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateBulkRequest {
    pub product_id: Uuid,
    pub specifications: Vec<BulkPayload>,
}

pub async fn create_bulk(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateBulkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authz::authorize_mutation(
        &state.ownership(),
        &auth.principal,
        ResourceRef::Product(req.product_id),
    )
    .await?;

    if req.specifications.is_empty() {
        return Err(ApiError::validation("specifications must not be empty"));
    }
    for spec in &req.specifications {
        require_field("key", &spec.key)?;
    }

    let entries = req
        .specifications
        .into_iter()
        .map(|s| SpecificationEntry {
            key: s.key,
            value: s.value,
        })
        .collect();

    let specifications = state
        .specifications()
        .create_bulk(req.product_id, entries)
        .await?;

    Ok(created(serde_json::json!({
        "specifications": specifications
    })))
}

pub async fn list_by_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<Vec<Specification>>, ApiError> {
    Ok(Json(
        state.specifications().list_by_product(product_id).await?,
    ))
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateSpecificationRequest {
    pub key: Option<String>,
    pub value: Option<String>,
}

pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSpecificationRequest>,
) -> Result<Json<SpecificationResponse>, ApiError> {
    authz::authorize_mutation(
        &state.ownership(),
        &auth.principal,
        ResourceRef::Specification(id),
    )
    .await?;

    if let Some(ref key) = req.key {
        require_field("key", key)?;
    }

    let specification = state
        .specifications()
        .update(
            id,
            UpdateSpecification {
                key: req.key,
                value: req.value,
            },
        )
        .await?;

    Ok(Json(SpecificationResponse { specification }))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    authz::authorize_mutation(
        &state.ownership(),
        &auth.principal,
        ResourceRef::Specification(id),
    )
    .await?;

    state.specifications().delete(id).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}
