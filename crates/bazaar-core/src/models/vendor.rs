//! Vendor domain model.
//!
//! A vendor is a shop profile owned by exactly one user. Every
//! vendor-scoped resource (products and their children) resolves its
//! ownership up to `Vendor.user_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub id: Uuid,
    /// Owning user; one vendor profile per user.
    pub user_id: Uuid,
    pub shop_name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVendor {
    pub user_id: Uuid,
    pub shop_name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateVendor {
    pub shop_name: Option<String>,
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}
