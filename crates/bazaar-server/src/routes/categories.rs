//! Category endpoints, including the hierarchical tree view and the
//! tree-integrity guards on the write path.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_core::BazaarError;
use bazaar_core::models::category::{Category, CreateCategory, UpdateCategory};
use bazaar_core::repository::CategoryRepository;
use bazaar_core::tree::{self, CategoryNode, MAX_TREE_DEPTH};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::routes::{created, require_field};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: String,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub category: Category,
}

fn slug_conflict() -> ApiError {
    ApiError(BazaarError::AlreadyExists {
        entity: "category".into(),
    })
}

pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;
    require_field("name", &req.name)?;
    require_field("slug", &req.slug)?;

    if state.categories().slug_exists(&req.slug, None).await? {
        return Err(slug_conflict());
    }
    // A dangling parent reference is a 404, not a silent root.
    if let Some(parent_id) = req.parent_id {
        state.categories().get_by_id(parent_id).await?;
    }

    let category = state
        .categories()
        .create(CreateCategory {
            name: req.name,
            slug: req.slug,
            parent_id: req.parent_id,
        })
        .await?;

    Ok(created(CategoryResponse { category }))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.categories().list_all().await?))
}

pub async fn tree(State(state): State<AppState>) -> Result<Json<Vec<CategoryNode>>, ApiError> {
    let rows = state.categories().list_all().await?;
    Ok(Json(tree::build_forest(rows)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let category = state.categories().get_by_id(id).await?;
    Ok(Json(CategoryResponse { category }))
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    /// `null` makes the category a root; omitted leaves it in place.
    pub parent_id: Option<Option<Uuid>>,
}

pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, ApiError> {
    auth.require_admin()?;

    // 404 before any guard runs.
    state.categories().get_by_id(id).await?;

    if let Some(ref name) = req.name {
        require_field("name", name)?;
    }
    if let Some(ref slug) = req.slug {
        require_field("slug", slug)?;
        if state.categories().slug_exists(slug, Some(id)).await? {
            return Err(slug_conflict());
        }
    }

    // Reparenting must keep the tree acyclic.
    if let Some(Some(new_parent)) = req.parent_id {
        let parents: HashMap<Uuid, Option<Uuid>> = state
            .categories()
            .list_all()
            .await?
            .into_iter()
            .map(|c| (c.id, c.parent_id))
            .collect();
        tree::ensure_reparent_allowed(id, new_parent, &parents, MAX_TREE_DEPTH)?;
    }

    let category = state
        .categories()
        .update(
            id,
            UpdateCategory {
                name: req.name,
                slug: req.slug,
                parent_id: req.parent_id,
            },
        )
        .await?;

    Ok(Json(CategoryResponse { category }))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    auth.require_admin()?;

    state.categories().get_by_id(id).await?;

    let children = state.categories().count_children(id).await?;
    tree::ensure_no_children(children)?;

    state.categories().delete(id).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}
