//! SurrealDB implementation of [`BrandRepository`].

use bazaar_core::error::BazaarResult;
use bazaar_core::models::brand::{Brand, CreateBrand, UpdateBrand};
use bazaar_core::repository::BrandRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct BrandRow {
    name: String,
    slug: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct BrandRowWithId {
    record_id: String,
    name: String,
    slug: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BrandRow {
    fn into_brand(self, id: Uuid) -> Brand {
        Brand {
            id,
            name: self.name,
            slug: self.slug,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl BrandRowWithId {
    fn try_into_brand(self) -> Result<Brand, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(Brand {
            id,
            name: self.name,
            slug: self.slug,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Brand repository.
#[derive(Clone)]
pub struct SurrealBrandRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealBrandRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> BrandRepository for SurrealBrandRepository<C> {
    async fn create(&self, input: CreateBrand) -> BazaarResult<Brand> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('brand', $id) SET \
                 name = $name, slug = $slug",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("slug", input.slug))
            .await
            .map_err(DbError::from)?;

        // The unique slug index is the final authority on races.
        let mut result = result
            .check()
            .map_err(|e| DbError::conflict_or_surreal(e, "brand"))?;

        let rows: Vec<BrandRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "brand".into(),
            id: id_str,
        })?;

        Ok(row.into_brand(id))
    }

    async fn get_by_id(&self, id: Uuid) -> BazaarResult<Brand> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('brand', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BrandRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "brand".into(),
            id: id_str,
        })?;

        Ok(row.into_brand(id))
    }

    async fn update(&self, id: Uuid, input: UpdateBrand) -> BazaarResult<Brand> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.slug.is_some() {
            sets.push("slug = $slug");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('brand', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(slug) = input.slug {
            builder = builder.bind(("slug", slug));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::conflict_or_surreal(e, "brand"))?;

        let rows: Vec<BrandRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "brand".into(),
            id: id_str,
        })?;

        Ok(row.into_brand(id))
    }

    async fn delete(&self, id: Uuid) -> BazaarResult<()> {
        let id_str = id.to_string();

        self.db
            .query("DELETE type::record('brand', $id)")
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self) -> BazaarResult<Vec<Brand>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM brand \
                 ORDER BY name ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BrandRowWithId> = result.take(0).map_err(DbError::from)?;

        rows.into_iter()
            .map(|row| row.try_into_brand())
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn slug_exists(&self, slug: &str, exclude_id: Option<Uuid>) -> BazaarResult<bool> {
        let query = match exclude_id {
            Some(_) => {
                "SELECT count() AS total FROM brand \
                 WHERE slug = $slug AND meta::id(id) != $exclude \
                 GROUP ALL"
            }
            None => {
                "SELECT count() AS total FROM brand \
                 WHERE slug = $slug GROUP ALL"
            }
        };

        let mut builder = self.db.query(query).bind(("slug", slug.to_string()));
        if let Some(exclude) = exclude_id {
            builder = builder.bind(("exclude", exclude.to_string()));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;

        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }
}
