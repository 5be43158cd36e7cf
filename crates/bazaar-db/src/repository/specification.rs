//! SurrealDB implementation of [`SpecificationRepository`].

use bazaar_core::error::BazaarResult;
use bazaar_core::models::specification::{
    CreateSpecification, Specification, SpecificationEntry, UpdateSpecification,
};
use bazaar_core::repository::SpecificationRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SpecificationRow {
    product_id: String,
    key: String,
    value: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct SpecificationRowWithId {
    record_id: String,
    product_id: String,
    key: String,
    value: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SpecificationRow {
    fn into_specification(self, id: Uuid) -> Result<Specification, DbError> {
        let product_id = Uuid::parse_str(&self.product_id)
            .map_err(|e| DbError::Migration(format!("invalid product UUID: {e}")))?;
        Ok(Specification {
            id,
            product_id,
            key: self.key,
            value: self.value,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl SpecificationRowWithId {
    fn try_into_specification(self) -> Result<Specification, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let product_id = Uuid::parse_str(&self.product_id)
            .map_err(|e| DbError::Migration(format!("invalid product UUID: {e}")))?;
        Ok(Specification {
            id,
            product_id,
            key: self.key,
            value: self.value,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Specification repository.
#[derive(Clone)]
pub struct SurrealSpecificationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSpecificationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SpecificationRepository for SurrealSpecificationRepository<C> {
    async fn create(&self, input: CreateSpecification) -> BazaarResult<Specification> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "CREATE type::record('product_specification', $id) SET \
                 product_id = $product_id, \
                 key = $key, value = $value",
            )
            .bind(("id", id_str.clone()))
            .bind(("product_id", input.product_id.to_string()))
            .bind(("key", input.key))
            .bind(("value", input.value))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SpecificationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "specification".into(),
            id: id_str,
        })?;

        Ok(row.into_specification(id)?)
    }

    async fn create_bulk(
        &self,
        product_id: Uuid,
        entries: Vec<SpecificationEntry>,
    ) -> BazaarResult<Vec<Specification>> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        // All rows land or none do.
        let mut query = String::from("BEGIN TRANSACTION;");
        for i in 0..entries.len() {
            query.push_str(&format!(
                " CREATE product_specification SET \
                 product_id = $product_id, \
                 key = $key_{i}, value = $value_{i};"
            ));
        }
        query.push_str(" COMMIT TRANSACTION;");

        let mut builder = self
            .db
            .query(&query)
            .bind(("product_id", product_id.to_string()));
        for (i, entry) in entries.into_iter().enumerate() {
            builder = builder
                .bind((format!("key_{i}"), entry.key))
                .bind((format!("value_{i}"), entry.value));
        }

        let result = builder.await.map_err(DbError::from)?;
        result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        self.list_by_product(product_id).await
    }

    async fn get_by_id(&self, id: Uuid) -> BazaarResult<Specification> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('product_specification', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SpecificationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "specification".into(),
            id: id_str,
        })?;

        Ok(row.into_specification(id)?)
    }

    async fn list_by_product(&self, product_id: Uuid) -> BazaarResult<Vec<Specification>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM product_specification \
                 WHERE product_id = $product_id \
                 ORDER BY created_at ASC",
            )
            .bind(("product_id", product_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SpecificationRowWithId> = result.take(0).map_err(DbError::from)?;

        rows.into_iter()
            .map(|row| row.try_into_specification())
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn update(&self, id: Uuid, input: UpdateSpecification) -> BazaarResult<Specification> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.key.is_some() {
            sets.push("key = $key");
        }
        if input.value.is_some() {
            sets.push("value = $value");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('product_specification', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(key) = input.key {
            builder = builder.bind(("key", key));
        }
        if let Some(value) = input.value {
            builder = builder.bind(("value", value));
        }

        let mut result = builder.await.map_err(DbError::from)?;

        let rows: Vec<SpecificationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "specification".into(),
            id: id_str,
        })?;

        Ok(row.into_specification(id)?)
    }

    async fn delete(&self, id: Uuid) -> BazaarResult<()> {
        let id_str = id.to_string();

        self.db
            .query("DELETE type::record('product_specification', $id)")
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
