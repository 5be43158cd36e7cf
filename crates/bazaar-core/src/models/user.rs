//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Unique across all users.
    pub email: String,
    /// Unique when present.
    pub phone: Option<String>,
    pub address: String,
    pub profile_pic: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role_id: Uuid,
    /// Accounts are deactivated (soft-deleted), never removed.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: String,
    pub profile_pic: Option<String>,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
    pub role_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub phone: Option<Option<String>>,
    pub address: Option<String>,
    pub profile_pic: Option<Option<String>>,
    pub is_active: Option<bool>,
}
