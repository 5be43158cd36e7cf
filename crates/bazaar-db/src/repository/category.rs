//! SurrealDB implementation of [`CategoryRepository`].
//!
//! Tree invariants (self-parent, cycles, delete guard) are enforced
//! by the callers using `bazaar_core::tree`; this layer only moves
//! rows.

use bazaar_core::error::BazaarResult;
use bazaar_core::models::category::{Category, CreateCategory, UpdateCategory};
use bazaar_core::repository::CategoryRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct CategoryRow {
    name: String,
    slug: String,
    parent_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct CategoryRowWithId {
    record_id: String,
    name: String,
    slug: String,
    parent_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CategoryRow {
    fn into_category(self, id: Uuid) -> Result<Category, DbError> {
        let parent_id = self
            .parent_id
            .map(|p| Uuid::parse_str(&p))
            .transpose()
            .map_err(|e| DbError::Migration(format!("invalid parent UUID: {e}")))?;
        Ok(Category {
            id,
            name: self.name,
            slug: self.slug,
            parent_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl CategoryRowWithId {
    fn try_into_category(self) -> Result<Category, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let parent_id = self
            .parent_id
            .map(|p| Uuid::parse_str(&p))
            .transpose()
            .map_err(|e| DbError::Migration(format!("invalid parent UUID: {e}")))?;
        Ok(Category {
            id,
            name: self.name,
            slug: self.slug,
            parent_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Category repository.
#[derive(Clone)]
pub struct SurrealCategoryRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCategoryRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CategoryRepository for SurrealCategoryRepository<C> {
    async fn create(&self, input: CreateCategory) -> BazaarResult<Category> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('category', $id) SET \
                 name = $name, slug = $slug, \
                 parent_id = $parent_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("slug", input.slug))
            .bind(("parent_id", input.parent_id.map(|p| p.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::conflict_or_surreal(e, "category"))?;

        let rows: Vec<CategoryRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "category".into(),
            id: id_str,
        })?;

        Ok(row.into_category(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> BazaarResult<Category> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('category', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CategoryRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "category".into(),
            id: id_str,
        })?;

        Ok(row.into_category(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateCategory) -> BazaarResult<Category> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.slug.is_some() {
            sets.push("slug = $slug");
        }
        if input.parent_id.is_some() {
            sets.push("parent_id = $parent_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('category', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(slug) = input.slug {
            builder = builder.bind(("slug", slug));
        }
        if let Some(parent_id) = input.parent_id {
            // parent_id is Option<Option<Uuid>>: Some(None) = make root
            builder = builder.bind(("parent_id", parent_id.map(|p| p.to_string())));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::conflict_or_surreal(e, "category"))?;

        let rows: Vec<CategoryRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "category".into(),
            id: id_str,
        })?;

        Ok(row.into_category(id)?)
    }

    async fn delete(&self, id: Uuid) -> BazaarResult<()> {
        let id_str = id.to_string();

        self.db
            .query("DELETE type::record('category', $id)")
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_all(&self) -> BazaarResult<Vec<Category>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM category \
                 ORDER BY name ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CategoryRowWithId> = result.take(0).map_err(DbError::from)?;

        rows.into_iter()
            .map(|row| row.try_into_category())
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn count_children(&self, id: Uuid) -> BazaarResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM category \
                 WHERE parent_id = $parent GROUP ALL",
            )
            .bind(("parent", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn slug_exists(&self, slug: &str, exclude_id: Option<Uuid>) -> BazaarResult<bool> {
        let query = match exclude_id {
            Some(_) => {
                "SELECT count() AS total FROM category \
                 WHERE slug = $slug AND meta::id(id) != $exclude \
                 GROUP ALL"
            }
            None => {
                "SELECT count() AS total FROM category \
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
