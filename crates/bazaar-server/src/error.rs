//! API error mapping: core taxonomy → HTTP status + JSON body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use bazaar_core::BazaarError;
use bazaar_core::tree::TreeError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Error type returned by every handler.
#[derive(Debug)]
pub struct ApiError(pub BazaarError);

impl From<BazaarError> for ApiError {
    fn from(err: BazaarError) -> Self {
        ApiError(err)
    }
}

impl From<TreeError> for ApiError {
    fn from(err: TreeError) -> Self {
        ApiError(err.into())
    }
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError(BazaarError::Validation {
            message: message.into(),
        })
    }

    pub fn unauthorized(reason: impl Into<String>) -> Self {
        ApiError(BazaarError::AuthenticationFailed {
            reason: reason.into(),
        })
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        ApiError(BazaarError::AuthorizationDenied {
            reason: reason.into(),
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            BazaarError::Validation { message } => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            BazaarError::AuthenticationFailed { reason } => {
                (StatusCode::UNAUTHORIZED, reason.clone())
            }
            BazaarError::AuthorizationDenied { reason } => {
                (StatusCode::FORBIDDEN, reason.clone())
            }
            BazaarError::NotFound { entity, .. } => {
                (StatusCode::NOT_FOUND, format!("{entity} not found"))
            }
            BazaarError::AlreadyExists { entity } => {
                (StatusCode::CONFLICT, format!("{entity} already exists"))
            }
            BazaarError::Database(_) | BazaarError::Internal(_) => {
                // Never leak internals to the client.
                tracing::error!(error = %self.0, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
