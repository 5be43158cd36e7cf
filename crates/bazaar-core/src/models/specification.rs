//! Product specification domain model (key/value attributes).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specification {
    pub id: Uuid,
    pub product_id: Uuid,
    pub key: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSpecification {
    pub product_id: Uuid,
    pub key: String,
    pub value: String,
}

/// One key/value pair inside a bulk insert or a product-create cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecificationEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateSpecification {
    pub key: Option<String>,
    pub value: Option<String>,
}
