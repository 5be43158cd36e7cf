//! Product domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub brand_id: Option<Uuid>,
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    /// Must be strictly positive.
    pub original_price: f64,
    /// Percentage in `[0, 100]`.
    pub discount: f64,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    /// Soft-delete flag; deleted products stay in the table.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Effective price after applying the discount percentage.
    pub fn sale_price(&self) -> f64 {
        self.original_price * (1.0 - self.discount / 100.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProduct {
    pub vendor_id: Uuid,
    pub brand_id: Option<Uuid>,
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub original_price: f64,
    pub discount: Option<f64>,
    pub images: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateProduct {
    pub brand_id: Option<Option<Uuid>>,
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub short_description: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub original_price: Option<f64>,
    pub discount: Option<f64>,
    pub images: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Query filters for product listings.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub vendor_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    /// Substring match on the product name.
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub is_active: Option<bool>,
}
