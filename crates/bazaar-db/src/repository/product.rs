//! SurrealDB implementation of [`ProductRepository`].
//!
//! Multi-row mutations (create with specifications/warranty, purge
//! with dependent rows) run inside a single `BEGIN`/`COMMIT`
//! transaction so a failure rolls back every row.

use bazaar_core::error::BazaarResult;
use bazaar_core::models::product::{CreateProduct, Product, ProductFilter, UpdateProduct};
use bazaar_core::models::specification::SpecificationEntry;
use bazaar_core::models::warranty::WarrantyEntry;
use bazaar_core::repository::{PaginatedResult, Pagination, ProductRepository};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ProductRow {
    vendor_id: String,
    brand_id: Option<String>,
    category_id: String,
    name: String,
    slug: String,
    short_description: Option<String>,
    description: Option<String>,
    original_price: f64,
    discount: f64,
    images: Vec<String>,
    tags: Vec<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ProductRowWithId {
    record_id: String,
    vendor_id: String,
    brand_id: Option<String>,
    category_id: String,
    name: String,
    slug: String,
    short_description: Option<String>,
    description: Option<String>,
    original_price: f64,
    discount: f64,
    images: Vec<String>,
    tags: Vec<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Migration(format!("invalid {what} UUID: {e}")))
}

impl ProductRow {
    fn into_product(self, id: Uuid) -> Result<Product, DbError> {
        Ok(Product {
            id,
            vendor_id: parse_uuid(&self.vendor_id, "vendor")?,
            brand_id: self
                .brand_id
                .as_deref()
                .map(|b| parse_uuid(b, "brand"))
                .transpose()?,
            category_id: parse_uuid(&self.category_id, "category")?,
            name: self.name,
            slug: self.slug,
            short_description: self.short_description,
            description: self.description,
            original_price: self.original_price,
            discount: self.discount,
            images: self.images,
            tags: self.tags,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ProductRowWithId {
    fn try_into_product(self) -> Result<Product, DbError> {
        let id = parse_uuid(&self.record_id, "product")?;
        Ok(Product {
            id,
            vendor_id: parse_uuid(&self.vendor_id, "vendor")?,
            brand_id: self
                .brand_id
                .as_deref()
                .map(|b| parse_uuid(b, "brand"))
                .transpose()?,
            category_id: parse_uuid(&self.category_id, "category")?,
            name: self.name,
            slug: self.slug,
            short_description: self.short_description,
            description: self.description,
            original_price: self.original_price,
            discount: self.discount,
            images: self.images,
            tags: self.tags,
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

/// SurrealDB implementation of the Product repository.
#[derive(Clone)]
pub struct SurrealProductRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProductRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ProductRepository for SurrealProductRepository<C> {
    async fn create(
        &self,
        input: CreateProduct,
        specifications: Vec<SpecificationEntry>,
        warranty: Option<WarrantyEntry>,
    ) -> BazaarResult<Product> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        // Product plus its specification/warranty rows: all land or
        // none do.
        let mut query = String::from(
            "BEGIN TRANSACTION; \
             CREATE type::record('product', $id) SET \
             vendor_id = $vendor_id, brand_id = $brand_id, \
             category_id = $category_id, \
             name = $name, slug = $slug, \
             short_description = $short_description, \
             description = $description, \
             original_price = $original_price, \
             discount = $discount, \
             images = $images, tags = $tags, \
             is_active = $is_active;",
        );
        for i in 0..specifications.len() {
            query.push_str(&format!(
                " CREATE product_specification SET \
                 product_id = $id, \
                 key = $spec_key_{i}, value = $spec_value_{i};"
            ));
        }
        if warranty.is_some() {
            query.push_str(
                " CREATE product_warranty SET \
                 product_id = $id, \
                 warranty_period = $warranty_period, \
                 warranty_type = $warranty_type, \
                 details = $warranty_details;",
            );
        }
        query.push_str(" COMMIT TRANSACTION;");

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", input.vendor_id.to_string()))
            .bind(("brand_id", input.brand_id.map(|b| b.to_string())))
            .bind(("category_id", input.category_id.to_string()))
            .bind(("name", input.name))
            .bind(("slug", input.slug))
            .bind(("short_description", input.short_description))
            .bind(("description", input.description))
            .bind(("original_price", input.original_price))
            .bind(("discount", input.discount.unwrap_or(0.0)))
            .bind(("images", input.images.unwrap_or_default()))
            .bind(("tags", input.tags.unwrap_or_default()))
            .bind(("is_active", input.is_active.unwrap_or(true)));

        for (i, entry) in specifications.into_iter().enumerate() {
            builder = builder
                .bind((format!("spec_key_{i}"), entry.key))
                .bind((format!("spec_value_{i}"), entry.value));
        }
        if let Some(entry) = warranty {
            builder = builder
                .bind(("warranty_period", entry.warranty_period))
                .bind(("warranty_type", entry.warranty_type))
                .bind(("warranty_details", entry.details));
        }

        let result = builder.await.map_err(DbError::from)?;
        result
            .check()
            .map_err(|e| DbError::conflict_or_surreal(e, "product"))?;

        // Re-read outside the transaction rather than untangling
        // per-statement result indices.
        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: Uuid) -> BazaarResult<Product> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('product', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProductRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "product".into(),
            id: id_str,
        })?;

        Ok(row.into_product(id)?)
    }

    async fn get_by_slug(&self, slug: &str) -> BazaarResult<Product> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM product \
                 WHERE slug = $slug",
            )
            .bind(("slug", slug.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProductRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "product".into(),
            id: format!("slug={slug}"),
        })?;

        Ok(row.try_into_product()?)
    }

    async fn update(&self, id: Uuid, input: UpdateProduct) -> BazaarResult<Product> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.brand_id.is_some() {
            sets.push("brand_id = $brand_id");
        }
        if input.category_id.is_some() {
            sets.push("category_id = $category_id");
        }
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.slug.is_some() {
            sets.push("slug = $slug");
        }
        if input.short_description.is_some() {
            sets.push("short_description = $short_description");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.original_price.is_some() {
            sets.push("original_price = $original_price");
        }
        if input.discount.is_some() {
            sets.push("discount = $discount");
        }
        if input.images.is_some() {
            sets.push("images = $images");
        }
        if input.tags.is_some() {
            sets.push("tags = $tags");
        }
        if input.is_active.is_some() {
            sets.push("is_active = $is_active");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('product', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(brand_id) = input.brand_id {
            // brand_id is Option<Option<Uuid>>: Some(None) = detach brand
            builder = builder.bind(("brand_id", brand_id.map(|b| b.to_string())));
        }
        if let Some(category_id) = input.category_id {
            builder = builder.bind(("category_id", category_id.to_string()));
        }
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(slug) = input.slug {
            builder = builder.bind(("slug", slug));
        }
        if let Some(short_description) = input.short_description {
            builder = builder.bind(("short_description", short_description));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(original_price) = input.original_price {
            builder = builder.bind(("original_price", original_price));
        }
        if let Some(discount) = input.discount {
            builder = builder.bind(("discount", discount));
        }
        if let Some(images) = input.images {
            builder = builder.bind(("images", images));
        }
        if let Some(tags) = input.tags {
            builder = builder.bind(("tags", tags));
        }
        if let Some(is_active) = input.is_active {
            builder = builder.bind(("is_active", is_active));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::conflict_or_surreal(e, "product"))?;

        let rows: Vec<ProductRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "product".into(),
            id: id_str,
        })?;

        Ok(row.into_product(id)?)
    }

    async fn delete(&self, id: Uuid) -> BazaarResult<()> {
        // Soft-delete: the row stays for order history.
        let id_str = id.to_string();

        self.db
            .query(
                "UPDATE type::record('product', $id) SET \
                 is_active = false, updated_at = time::now()",
            )
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn purge(&self, id: Uuid) -> BazaarResult<()> {
        let id_str = id.to_string();

        // Dependent rows and the product go in one transaction.
        let query = "\
            BEGIN TRANSACTION; \
            DELETE product_answer WHERE question_id IN \
                (SELECT VALUE meta::id(id) FROM product_question \
                 WHERE product_id = $id); \
            DELETE product_question WHERE product_id = $id; \
            DELETE product_specification WHERE product_id = $id; \
            DELETE product_warranty WHERE product_id = $id; \
            DELETE type::record('product', $id); \
            COMMIT TRANSACTION;";

        let result = self
            .db
            .query(query)
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        Ok(())
    }

    async fn list(
        &self,
        filter: ProductFilter,
        pagination: Pagination,
    ) -> BazaarResult<PaginatedResult<Product>> {
        let mut conditions = Vec::new();
        if filter.vendor_id.is_some() {
            conditions.push("vendor_id = $vendor_id");
        }
        if filter.category_id.is_some() {
            conditions.push("category_id = $category_id");
        }
        if filter.brand_id.is_some() {
            conditions.push("brand_id = $brand_id");
        }
        if filter.search.is_some() {
            conditions.push("string::lowercase(name) CONTAINS $search");
        }
        if filter.min_price.is_some() {
            conditions.push("original_price >= $min_price");
        }
        if filter.max_price.is_some() {
            conditions.push("original_price <= $max_price");
        }
        if filter.is_active.is_some() {
            conditions.push("is_active = $is_active");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!(
            "SELECT count() AS total FROM product{where_clause} GROUP ALL"
        );
        let page_query = format!(
            "SELECT meta::id(id) AS record_id, * FROM product{where_clause} \
             ORDER BY created_at DESC \
             LIMIT $limit START $offset"
        );

        let vendor_id = filter.vendor_id.map(|v| v.to_string());
        let category_id = filter.category_id.map(|c| c.to_string());
        let brand_id = filter.brand_id.map(|b| b.to_string());
        let search = filter.search.map(|s| s.to_lowercase());

        let mut count_builder = self.db.query(&count_query);
        if let Some(ref vendor_id) = vendor_id {
            count_builder = count_builder.bind(("vendor_id", vendor_id.clone()));
        }
        if let Some(ref category_id) = category_id {
            count_builder = count_builder.bind(("category_id", category_id.clone()));
        }
        if let Some(ref brand_id) = brand_id {
            count_builder = count_builder.bind(("brand_id", brand_id.clone()));
        }
        if let Some(ref search) = search {
            count_builder = count_builder.bind(("search", search.clone()));
        }
        if let Some(min_price) = filter.min_price {
            count_builder = count_builder.bind(("min_price", min_price));
        }
        if let Some(max_price) = filter.max_price {
            count_builder = count_builder.bind(("max_price", max_price));
        }
        if let Some(is_active) = filter.is_active {
            count_builder = count_builder.bind(("is_active", is_active));
        }

        let mut count_result = count_builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut builder = self
            .db
            .query(&page_query)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(vendor_id) = vendor_id {
            builder = builder.bind(("vendor_id", vendor_id));
        }
        if let Some(category_id) = category_id {
            builder = builder.bind(("category_id", category_id));
        }
        if let Some(brand_id) = brand_id {
            builder = builder.bind(("brand_id", brand_id));
        }
        if let Some(search) = search {
            builder = builder.bind(("search", search));
        }
        if let Some(min_price) = filter.min_price {
            builder = builder.bind(("min_price", min_price));
        }
        if let Some(max_price) = filter.max_price {
            builder = builder.bind(("max_price", max_price));
        }
        if let Some(is_active) = filter.is_active {
            builder = builder.bind(("is_active", is_active));
        }

        let mut result = builder.await.map_err(DbError::from)?;

        let rows: Vec<ProductRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_product())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn slug_exists(&self, slug: &str, exclude_id: Option<Uuid>) -> BazaarResult<bool> {
        let query = match exclude_id {
            Some(_) => {
                "SELECT count() AS total FROM product \
                 WHERE slug = $slug AND meta::id(id) != $exclude \
                 GROUP ALL"
            }
            None => {
                "SELECT count() AS total FROM product \
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
