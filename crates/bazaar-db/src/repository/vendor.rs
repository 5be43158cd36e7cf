//! SurrealDB implementation of [`VendorRepository`].

use bazaar_core::error::BazaarResult;
use bazaar_core::models::vendor::{CreateVendor, UpdateVendor, Vendor};
use bazaar_core::repository::{PaginatedResult, Pagination, VendorRepository};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct VendorRow {
    user_id: String,
    shop_name: String,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct VendorRowWithId {
    record_id: String,
    user_id: String,
    shop_name: String,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl VendorRow {
    fn into_vendor(self, id: Uuid) -> Result<Vendor, DbError> {
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Migration(format!("invalid user UUID: {e}")))?;
        Ok(Vendor {
            id,
            user_id,
            shop_name: self.shop_name,
            description: self.description,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl VendorRowWithId {
    fn try_into_vendor(self) -> Result<Vendor, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Migration(format!("invalid user UUID: {e}")))?;
        Ok(Vendor {
            id,
            user_id,
            shop_name: self.shop_name,
            description: self.description,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Vendor repository.
#[derive(Clone)]
pub struct SurrealVendorRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealVendorRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> VendorRepository for SurrealVendorRepository<C> {
    async fn create(&self, input: CreateVendor) -> BazaarResult<Vendor> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('vendor', $id) SET \
                 user_id = $user_id, \
                 shop_name = $shop_name, \
                 description = $description, \
                 is_active = true",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("shop_name", input.shop_name))
            .bind(("description", input.description))
            .await
            .map_err(DbError::from)?;

        // One vendor profile per user, enforced by the unique index.
        let mut result = result
            .check()
            .map_err(|e| DbError::conflict_or_surreal(e, "vendor"))?;

        let rows: Vec<VendorRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "vendor".into(),
            id: id_str,
        })?;

        Ok(row.into_vendor(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> BazaarResult<Vendor> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('vendor', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<VendorRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "vendor".into(),
            id: id_str,
        })?;

        Ok(row.into_vendor(id)?)
    }

    async fn get_by_user(&self, user_id: Uuid) -> BazaarResult<Vendor> {
        let user_id_str = user_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM vendor \
                 WHERE user_id = $user_id",
            )
            .bind(("user_id", user_id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<VendorRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "vendor".into(),
            id: format!("user={user_id_str}"),
        })?;

        Ok(row.try_into_vendor()?)
    }

    async fn update(&self, id: Uuid, input: UpdateVendor) -> BazaarResult<Vendor> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.shop_name.is_some() {
            sets.push("shop_name = $shop_name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.is_active.is_some() {
            sets.push("is_active = $is_active");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('vendor', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(shop_name) = input.shop_name {
            builder = builder.bind(("shop_name", shop_name));
        }
        if let Some(description) = input.description {
            // description is Option<Option<String>>: Some(None) = clear
            builder = builder.bind(("description", description));
        }
        if let Some(is_active) = input.is_active {
            builder = builder.bind(("is_active", is_active));
        }

        let mut result = builder.await.map_err(DbError::from)?;

        let rows: Vec<VendorRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "vendor".into(),
            id: id_str,
        })?;

        Ok(row.into_vendor(id)?)
    }

    async fn delete(&self, id: Uuid) -> BazaarResult<()> {
        let id_str = id.to_string();

        self.db
            .query("DELETE type::record('vendor', $id)")
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> BazaarResult<PaginatedResult<Vendor>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM vendor GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM vendor \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<VendorRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_vendor())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
