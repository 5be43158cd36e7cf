//! Request authentication: bearer/cookie token → [`Principal`].
//!
//! The token's role claim is advisory only; the authoritative role is
//! resolved from the database on every request, and a user or role
//! row missing for a syntactically valid token reads as unauthorized,
//! never as a server error.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use bazaar_auth::token;
use bazaar_core::BazaarError;
use bazaar_core::authz::Principal;
use bazaar_core::models::role::RoleName;
use bazaar_core::models::user::User;
use bazaar_core::repository::{RoleRepository, UserRepository};

use crate::config::ACCESS_TOKEN_COOKIE;
use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller, attached by extraction. Handlers take
/// this as an argument; the principal is then passed explicitly into
/// every ownership check.
pub struct AuthUser {
    pub principal: Principal,
    pub user: User,
}

impl AuthUser {
    /// Guard for admin-only endpoints.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.principal.role == RoleName::Admin {
            Ok(())
        } else {
            Err(ApiError::forbidden("admin role required"))
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
}

fn cookie_token(parts: &Parts) -> Option<String> {
    let cookies = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == ACCESS_TOKEN_COOKIE).then(|| value.to_string())
    })
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = bearer_token(parts)
            .or_else(|| cookie_token(parts))
            .ok_or_else(|| ApiError::unauthorized("missing access token"))?;

        let claims = token::validate_access_token(&raw, &state.auth)
            .map_err(|e| ApiError(BazaarError::from(e)))?;
        let user_id = claims
            .user_id()
            .map_err(|e| ApiError(BazaarError::from(e)))?;

        // A valid signature over a vanished account is a data
        // inconsistency; the caller just sees 401.
        let user = state.users().get_by_id(user_id).await.map_err(|e| match e {
            BazaarError::NotFound { .. } => ApiError::unauthorized("account no longer exists"),
            other => ApiError(other),
        })?;
        if !user.is_active {
            return Err(ApiError::unauthorized("account is deactivated"));
        }

        let resolved = state
            .roles()
            .resolve_role(user_id)
            .await
            .map_err(|e| match e {
                BazaarError::NotFound { .. } => ApiError::unauthorized("role cannot be resolved"),
                other => ApiError(other),
            })?;

        Ok(AuthUser {
            principal: Principal {
                user_id,
                role: resolved.name,
            },
            user,
        })
    }
}
