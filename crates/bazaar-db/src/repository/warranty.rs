//! SurrealDB implementation of [`WarrantyRepository`].

use bazaar_core::error::BazaarResult;
use bazaar_core::models::warranty::{CreateWarranty, UpdateWarranty, Warranty};
use bazaar_core::repository::WarrantyRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct WarrantyRow {
    product_id: String,
    warranty_period: String,
    warranty_type: Option<String>,
    details: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct WarrantyRowWithId {
    record_id: String,
    product_id: String,
    warranty_period: String,
    warranty_type: Option<String>,
    details: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WarrantyRow {
    fn into_warranty(self, id: Uuid) -> Result<Warranty, DbError> {
        let product_id = Uuid::parse_str(&self.product_id)
            .map_err(|e| DbError::Migration(format!("invalid product UUID: {e}")))?;
        Ok(Warranty {
            id,
            product_id,
            warranty_period: self.warranty_period,
            warranty_type: self.warranty_type,
            details: self.details,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl WarrantyRowWithId {
    fn try_into_warranty(self) -> Result<Warranty, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let product_id = Uuid::parse_str(&self.product_id)
            .map_err(|e| DbError::Migration(format!("invalid product UUID: {e}")))?;
        Ok(Warranty {
            id,
            product_id,
            warranty_period: self.warranty_period,
            warranty_type: self.warranty_type,
            details: self.details,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Warranty repository.
#[derive(Clone)]
pub struct SurrealWarrantyRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealWarrantyRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> WarrantyRepository for SurrealWarrantyRepository<C> {
    async fn create(&self, input: CreateWarranty) -> BazaarResult<Warranty> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('product_warranty', $id) SET \
                 product_id = $product_id, \
                 warranty_period = $warranty_period, \
                 warranty_type = $warranty_type, \
                 details = $details",
            )
            .bind(("id", id_str.clone()))
            .bind(("product_id", input.product_id.to_string()))
            .bind(("warranty_period", input.warranty_period))
            .bind(("warranty_type", input.warranty_type))
            .bind(("details", input.details))
            .await
            .map_err(DbError::from)?;

        // At most one warranty per product, enforced by the unique
        // index.
        let mut result = result
            .check()
            .map_err(|e| DbError::conflict_or_surreal(e, "warranty"))?;

        let rows: Vec<WarrantyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "warranty".into(),
            id: id_str,
        })?;

        Ok(row.into_warranty(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> BazaarResult<Warranty> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('product_warranty', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<WarrantyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "warranty".into(),
            id: id_str,
        })?;

        Ok(row.into_warranty(id)?)
    }

    async fn get_by_product(&self, product_id: Uuid) -> BazaarResult<Warranty> {
        let product_id_str = product_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM product_warranty \
                 WHERE product_id = $product_id",
            )
            .bind(("product_id", product_id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<WarrantyRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "warranty".into(),
            id: format!("product={product_id_str}"),
        })?;

        Ok(row.try_into_warranty()?)
    }

    async fn update(&self, id: Uuid, input: UpdateWarranty) -> BazaarResult<Warranty> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.warranty_period.is_some() {
            sets.push("warranty_period = $warranty_period");
        }
        if input.warranty_type.is_some() {
            sets.push("warranty_type = $warranty_type");
        }
        if input.details.is_some() {
            sets.push("details = $details");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('product_warranty', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(warranty_period) = input.warranty_period {
            builder = builder.bind(("warranty_period", warranty_period));
        }
        if let Some(warranty_type) = input.warranty_type {
            // warranty_type is Option<Option<String>>: Some(None) = clear
            builder = builder.bind(("warranty_type", warranty_type));
        }
        if let Some(details) = input.details {
            builder = builder.bind(("details", details));
        }

        let mut result = builder.await.map_err(DbError::from)?;

        let rows: Vec<WarrantyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "warranty".into(),
            id: id_str,
        })?;

        Ok(row.into_warranty(id)?)
    }

    async fn delete(&self, id: Uuid) -> BazaarResult<()> {
        let id_str = id.to_string();

        self.db
            .query("DELETE type::record('product_warranty', $id)")
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
