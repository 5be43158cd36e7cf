//! Server configuration from environment variables.

use bazaar_auth::AuthConfig;
use bazaar_db::DbConfig;

/// Name of the cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub db: DbConfig,
    pub auth: AuthConfig,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl ServerConfig {
    /// Read configuration from the environment, falling back to
    /// development defaults.
    pub fn from_env() -> Self {
        let port = env_or("BAZAAR_PORT", "3000").parse().unwrap_or(3000);

        let db = DbConfig {
            url: env_or("BAZAAR_DB_URL", "127.0.0.1:8000"),
            namespace: env_or("BAZAAR_DB_NAMESPACE", "bazaar"),
            database: env_or("BAZAAR_DB_DATABASE", "main"),
            username: env_or("BAZAAR_DB_USERNAME", "root"),
            password: env_or("BAZAAR_DB_PASSWORD", "root"),
        };

        let auth = AuthConfig {
            jwt_private_key_pem: env_or("BAZAAR_JWT_PRIVATE_KEY", ""),
            jwt_public_key_pem: env_or("BAZAAR_JWT_PUBLIC_KEY", ""),
            access_token_lifetime_secs: env_or("BAZAAR_TOKEN_LIFETIME_SECS", "86400")
                .parse()
                .unwrap_or(86_400),
            jwt_issuer: env_or("BAZAAR_JWT_ISSUER", "bazaar"),
            pepper: std::env::var("BAZAAR_PASSWORD_PEPPER").ok(),
            min_password_length: env_or("BAZAAR_MIN_PASSWORD_LENGTH", "8")
                .parse()
                .unwrap_or(8),
        };

        Self { port, db, auth }
    }
}
