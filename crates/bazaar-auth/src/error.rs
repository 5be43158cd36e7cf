//! Authentication error types.

use bazaar_core::error::BazaarError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is deactivated")]
    AccountInactive,

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for BazaarError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => BazaarError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::AccountInactive => BazaarError::AuthorizationDenied {
                reason: err.to_string(),
            },
            AuthError::PasswordTooShort { .. } => BazaarError::Validation {
                message: err.to_string(),
            },
            AuthError::Crypto(msg) => BazaarError::Internal(msg),
        }
    }
}
