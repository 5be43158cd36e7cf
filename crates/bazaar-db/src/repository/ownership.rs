//! SurrealDB implementation of the ownership-resolution seam.
//!
//! Each method is a single-field point read for one hop of the
//! ownership chain; `bazaar_core::authz` does the walking.

use bazaar_core::authz::{OwnershipLookup, VendorOwner};
use bazaar_core::error::BazaarResult;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct VendorOwnerRow {
    user_id: String,
    is_active: bool,
}

#[derive(Debug, SurrealValue)]
struct VendorIdRow {
    vendor_id: String,
}

#[derive(Debug, SurrealValue)]
struct ProductIdRow {
    product_id: String,
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Migration(format!("invalid {what} UUID: {e}")))
}

fn missing(entity: &str, id: Uuid) -> DbError {
    DbError::NotFound {
        entity: entity.into(),
        id: id.to_string(),
    }
}

/// SurrealDB-backed [`OwnershipLookup`].
#[derive(Clone)]
pub struct SurrealOwnershipLookup<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOwnershipLookup<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OwnershipLookup for SurrealOwnershipLookup<C> {
    async fn vendor_owner(&self, vendor_id: Uuid) -> BazaarResult<VendorOwner> {
        let mut result = self
            .db
            .query("SELECT user_id, is_active FROM type::record('vendor', $id)")
            .bind(("id", vendor_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<VendorOwnerRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| missing("vendor", vendor_id))?;

        Ok(VendorOwner {
            vendor_id,
            user_id: parse_uuid(&row.user_id, "user")?,
            is_active: row.is_active,
        })
    }

    async fn product_vendor(&self, product_id: Uuid) -> BazaarResult<Uuid> {
        let mut result = self
            .db
            .query("SELECT vendor_id FROM type::record('product', $id)")
            .bind(("id", product_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<VendorIdRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| missing("product", product_id))?;

        Ok(parse_uuid(&row.vendor_id, "vendor")?)
    }

    async fn specification_product(&self, specification_id: Uuid) -> BazaarResult<Uuid> {
        let mut result = self
            .db
            .query("SELECT product_id FROM type::record('product_specification', $id)")
            .bind(("id", specification_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProductIdRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| missing("specification", specification_id))?;

        Ok(parse_uuid(&row.product_id, "product")?)
    }

    async fn warranty_product(&self, warranty_id: Uuid) -> BazaarResult<Uuid> {
        let mut result = self
            .db
            .query("SELECT product_id FROM type::record('product_warranty', $id)")
            .bind(("id", warranty_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProductIdRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| missing("warranty", warranty_id))?;

        Ok(parse_uuid(&row.product_id, "product")?)
    }

    async fn answer_vendor(&self, answer_id: Uuid) -> BazaarResult<Uuid> {
        let mut result = self
            .db
            .query("SELECT vendor_id FROM type::record('product_answer', $id)")
            .bind(("id", answer_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<VendorIdRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| missing("answer", answer_id))?;

        Ok(parse_uuid(&row.vendor_id, "vendor")?)
    }
}
