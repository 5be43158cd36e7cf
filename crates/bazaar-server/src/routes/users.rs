//! Account endpoints: registration, login, whoami, and user
//! administration.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_auth::service::{LoginInput, RegisterInput};
use bazaar_core::models::role::{ResolvedRole, RoleName};
use bazaar_core::models::user::{UpdateUser, User};
use bazaar_core::repository::{Pagination, UserFilter, UserRepository};

use crate::auth::AuthUser;
use crate::config::ACCESS_TOKEN_COOKIE;
use crate::error::ApiError;
use crate::routes::{created, require_field, PageResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: String,
    pub profile_pic: Option<String>,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_field("first_name", &req.first_name)?;
    require_field("last_name", &req.last_name)?;
    require_field("email", &req.email)?;
    require_field("address", &req.address)?;

    let user = state
        .auth_service()
        .register(RegisterInput {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            address: req.address,
            profile_pic: req.profile_pic,
            password: req.password,
        })
        .await?;

    Ok(created(UserResponse { user }))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
    pub role: RoleName,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    require_field("email", &req.email)?;
    require_field("password", &req.password)?;

    let output = state
        .auth_service()
        .login(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let cookie = format!(
        "{ACCESS_TOKEN_COOKIE}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        output.access_token, output.expires_in,
    );

    let body = LoginResponse {
        token: output.access_token,
        user: output.user,
        role: output.role,
    };

    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

#[derive(Debug, Serialize)]
pub struct WhoamiResponse {
    pub user_id: Uuid,
    pub role: ResolvedRole,
    pub user: User,
}

pub async fn whoami(auth: AuthUser) -> Json<WhoamiResponse> {
    Json(WhoamiResponse {
        user_id: auth.principal.user_id,
        role: auth.principal.role.into(),
        user: auth.user,
    })
}

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub search: Option<String>,
    pub role_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<PageResponse<User>>, ApiError> {
    auth.require_admin()?;

    let default = Pagination::default();
    let page = state
        .users()
        .list(
            UserFilter {
                search: query.search,
                role_id: query.role_id,
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

/// Admins may touch any account; everyone else only their own.
fn require_self_or_admin(auth: &AuthUser, id: Uuid) -> Result<(), ApiError> {
    if auth.principal.user_id == id {
        return Ok(());
    }
    auth.require_admin()
}

pub async fn get(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    require_self_or_admin(&auth, id)?;
    let user = state.users().get_by_id(id).await?;
    Ok(Json(UserResponse { user }))
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub address: Option<String>,
    pub profile_pic: Option<Option<String>>,
    pub is_active: Option<bool>,
}

pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    require_self_or_admin(&auth, id)?;

    // Only admins may flip activation through this endpoint.
    if req.is_active.is_some() {
        auth.require_admin()?;
    }
    if let Some(ref email) = req.email {
        require_field("email", email)?;
    }

    let user = state
        .users()
        .update(
            id,
            UpdateUser {
                first_name: req.first_name,
                last_name: req.last_name,
                email: req.email,
                phone: req.phone,
                address: req.address,
                profile_pic: req.profile_pic,
                is_active: req.is_active,
            },
        )
        .await?;

    Ok(Json(UserResponse { user }))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

pub async fn change_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    // Password changes always require the current password, so this
    // stays owner-only even for admins.
    if auth.principal.user_id != id {
        return Err(ApiError::forbidden("password can only be changed by the account owner"));
    }

    state
        .auth_service()
        .change_password(id, &req.current_password, &req.new_password)
        .await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

pub async fn deactivate(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_self_or_admin(&auth, id)?;

    // Ensure the target exists so a stale id reads as 404.
    state.users().get_by_id(id).await?;
    state.users().deactivate(id).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}
