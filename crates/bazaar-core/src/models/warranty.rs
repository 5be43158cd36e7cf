//! Product warranty domain model. At most one warranty per product.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warranty {
    pub id: Uuid,
    pub product_id: Uuid,
    pub warranty_period: String,
    pub warranty_type: Option<String>,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWarranty {
    pub product_id: Uuid,
    pub warranty_period: String,
    pub warranty_type: Option<String>,
    pub details: Option<String>,
}

/// Warranty payload inside a product-create cascade (product id comes
/// from the surrounding insert).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarrantyEntry {
    pub warranty_period: String,
    pub warranty_type: Option<String>,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateWarranty {
    pub warranty_period: Option<String>,
    pub warranty_type: Option<Option<String>>,
    pub details: Option<Option<String>>,
}
