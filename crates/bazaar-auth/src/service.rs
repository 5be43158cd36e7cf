//! Authentication service — registration, login, and password
//! change orchestration.

use bazaar_core::error::{BazaarError, BazaarResult};
use bazaar_core::models::role::RoleName;
use bazaar_core::models::user::{CreateUser, User};
use bazaar_core::repository::{RoleRepository, UserRepository};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for the registration flow.
#[derive(Debug)]
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: String,
    pub profile_pic: Option<String>,
    pub password: String,
}

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed JWT access token.
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    /// The authenticated user.
    pub user: User,
    /// Role carried into the token.
    pub role: RoleName,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer
/// has no dependency on the database crate.
pub struct AuthService<U: UserRepository, R: RoleRepository> {
    user_repo: U,
    role_repo: R,
    config: AuthConfig,
}

impl<U: UserRepository, R: RoleRepository> AuthService<U, R> {
    pub fn new(user_repo: U, role_repo: R, config: AuthConfig) -> Self {
        Self {
            user_repo,
            role_repo,
            config,
        }
    }

    /// Register a new account with the default customer role.
    pub async fn register(&self, input: RegisterInput) -> BazaarResult<User> {
        self.check_password_policy(&input.password)?;

        // Fast-path duplicate check; the unique index closes the
        // race.
        match self.user_repo.get_by_email(&input.email).await {
            Ok(_) => {
                return Err(BazaarError::AlreadyExists {
                    entity: "user".into(),
                });
            }
            Err(BazaarError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let customer = self.role_repo.get_by_name(RoleName::Customer).await?;

        self.user_repo
            .create(CreateUser {
                first_name: input.first_name,
                last_name: input.last_name,
                email: input.email,
                phone: input.phone,
                address: input.address,
                profile_pic: input.profile_pic,
                password: input.password,
                role_id: customer.id,
            })
            .await
    }

    /// Authenticate with email + password and issue an access token.
    pub async fn login(&self, input: LoginInput) -> BazaarResult<LoginOutput> {
        // 1. Look up the account. A missing account reads the same as
        //    a bad password.
        let user = self
            .user_repo
            .get_by_email(&input.email)
            .await
            .map_err(|e| match e {
                BazaarError::NotFound { .. } => AuthError::InvalidCredentials.into(),
                other => other,
            })?;

        // 2. Verify password.
        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        // 3. Deactivated accounts cannot log in.
        if !user.is_active {
            return Err(AuthError::AccountInactive.into());
        }

        // 4. Resolve the role and issue the token.
        let resolved = self.role_repo.resolve_role(user.id).await?;
        let access_token = token::issue_access_token(user.id, resolved.name, &self.config)?;

        Ok(LoginOutput {
            access_token,
            expires_in: self.config.access_token_lifetime_secs,
            user,
            role: resolved.name,
        })
    }

    /// Change a password after verifying the current one.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> BazaarResult<()> {
        self.check_password_policy(new_password)?;

        let user = self.user_repo.get_by_id(user_id).await?;

        let valid = password::verify_password(
            current_password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        self.user_repo.set_password(user_id, new_password).await
    }

    fn check_password_policy(&self, password: &str) -> Result<(), AuthError> {
        if password.len() < self.config.min_password_length {
            return Err(AuthError::PasswordTooShort {
                min: self.config.min_password_length,
            });
        }
        Ok(())
    }
}
