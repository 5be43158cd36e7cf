//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Constrained string fields (role
//! names, order/payment statuses) use ASSERT for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: SCHEMA_V1,
    },
    Migration {
        version: 2,
        name: "seed_roles",
        sql: SEED_ROLES_V2,
    },
];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Roles (closed hierarchy, seeded by migration v2)
-- =======================================================================
DEFINE TABLE role SCHEMAFULL;
DEFINE FIELD name ON TABLE role TYPE string \
    ASSERT $value IN ['admin', 'vendor', 'customer'];
DEFINE FIELD level ON TABLE role TYPE int;
DEFINE FIELD created_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_role_name ON TABLE role COLUMNS name UNIQUE;
DEFINE INDEX idx_role_level ON TABLE role COLUMNS level UNIQUE;

-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD first_name ON TABLE user TYPE string;
DEFINE FIELD last_name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD phone ON TABLE user TYPE option<string>;
DEFINE FIELD address ON TABLE user TYPE string;
DEFINE FIELD profile_pic ON TABLE user TYPE option<string>;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD role_id ON TABLE user TYPE string;
DEFINE FIELD is_active ON TABLE user TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;
DEFINE INDEX idx_user_phone ON TABLE user COLUMNS phone;

-- =======================================================================
-- Vendors (one shop profile per user)
-- =======================================================================
DEFINE TABLE vendor SCHEMAFULL;
DEFINE FIELD user_id ON TABLE vendor TYPE string;
DEFINE FIELD shop_name ON TABLE vendor TYPE string;
DEFINE FIELD description ON TABLE vendor TYPE option<string>;
DEFINE FIELD is_active ON TABLE vendor TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE vendor TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE vendor TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_vendor_user ON TABLE vendor COLUMNS user_id UNIQUE;

-- =======================================================================
-- Brands
-- =======================================================================
DEFINE TABLE brand SCHEMAFULL;
DEFINE FIELD name ON TABLE brand TYPE string;
DEFINE FIELD slug ON TABLE brand TYPE string;
DEFINE FIELD created_at ON TABLE brand TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE brand TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_brand_slug ON TABLE brand COLUMNS slug UNIQUE;

-- =======================================================================
-- Categories (self-referential hierarchy)
-- =======================================================================
DEFINE TABLE category SCHEMAFULL;
DEFINE FIELD name ON TABLE category TYPE string;
DEFINE FIELD slug ON TABLE category TYPE string;
DEFINE FIELD parent_id ON TABLE category TYPE option<string>;
DEFINE FIELD created_at ON TABLE category TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE category TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_category_slug ON TABLE category COLUMNS slug UNIQUE;
DEFINE INDEX idx_category_parent ON TABLE category COLUMNS parent_id;

-- =======================================================================
-- Products
-- =======================================================================
DEFINE TABLE product SCHEMAFULL;
DEFINE FIELD vendor_id ON TABLE product TYPE string;
DEFINE FIELD brand_id ON TABLE product TYPE option<string>;
DEFINE FIELD category_id ON TABLE product TYPE string;
DEFINE FIELD name ON TABLE product TYPE string;
DEFINE FIELD slug ON TABLE product TYPE string;
DEFINE FIELD short_description ON TABLE product TYPE option<string>;
DEFINE FIELD description ON TABLE product TYPE option<string>;
DEFINE FIELD original_price ON TABLE product TYPE float \
    ASSERT $value > 0;
DEFINE FIELD discount ON TABLE product TYPE float DEFAULT 0 \
    ASSERT $value >= 0 AND $value <= 100;
DEFINE FIELD images ON TABLE product TYPE array DEFAULT [];
DEFINE FIELD images.* ON TABLE product TYPE string;
DEFINE FIELD tags ON TABLE product TYPE array DEFAULT [];
DEFINE FIELD tags.* ON TABLE product TYPE string;
DEFINE FIELD is_active ON TABLE product TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE product TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE product TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_product_slug ON TABLE product COLUMNS slug UNIQUE;
DEFINE INDEX idx_product_vendor ON TABLE product COLUMNS vendor_id;
DEFINE INDEX idx_product_category ON TABLE product COLUMNS category_id;
DEFINE INDEX idx_product_brand ON TABLE product COLUMNS brand_id;

-- =======================================================================
-- Product specifications (key/value attributes, many per product)
-- =======================================================================
DEFINE TABLE product_specification SCHEMAFULL;
DEFINE FIELD product_id ON TABLE product_specification TYPE string;
DEFINE FIELD key ON TABLE product_specification TYPE string;
DEFINE FIELD value ON TABLE product_specification TYPE string;
DEFINE FIELD created_at ON TABLE product_specification TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE product_specification TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_spec_product ON TABLE product_specification \
    COLUMNS product_id;

-- =======================================================================
-- Product warranty (at most one per product)
-- =======================================================================
DEFINE TABLE product_warranty SCHEMAFULL;
DEFINE FIELD product_id ON TABLE product_warranty TYPE string;
DEFINE FIELD warranty_period ON TABLE product_warranty TYPE string;
DEFINE FIELD warranty_type ON TABLE product_warranty \
    TYPE option<string>;
DEFINE FIELD details ON TABLE product_warranty TYPE option<string>;
DEFINE FIELD created_at ON TABLE product_warranty TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE product_warranty TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_warranty_product ON TABLE product_warranty \
    COLUMNS product_id UNIQUE;

-- =======================================================================
-- Product Q&A
-- =======================================================================
DEFINE TABLE product_question SCHEMAFULL;
DEFINE FIELD product_id ON TABLE product_question TYPE string;
DEFINE FIELD user_id ON TABLE product_question TYPE string;
DEFINE FIELD question ON TABLE product_question TYPE string;
DEFINE FIELD created_at ON TABLE product_question TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE product_question TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_question_product ON TABLE product_question \
    COLUMNS product_id;

DEFINE TABLE product_answer SCHEMAFULL;
DEFINE FIELD question_id ON TABLE product_answer TYPE string;
DEFINE FIELD vendor_id ON TABLE product_answer TYPE string;
DEFINE FIELD answer ON TABLE product_answer TYPE string;
DEFINE FIELD created_at ON TABLE product_answer TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE product_answer TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_answer_question_vendor ON TABLE product_answer \
    COLUMNS question_id, vendor_id UNIQUE;

-- =======================================================================
-- Orders & payments (schema only; no handlers)
-- =======================================================================
DEFINE TABLE orders SCHEMAFULL;
DEFINE FIELD user_id ON TABLE orders TYPE string;
DEFINE FIELD order_no ON TABLE orders TYPE string;
DEFINE FIELD total_amount ON TABLE orders TYPE float;
DEFINE FIELD status ON TABLE orders TYPE string \
    DEFAULT 'pending' \
    ASSERT $value IN ['pending', 'processing', 'shipped', \
    'completed', 'cancelled'];
DEFINE FIELD payment_status ON TABLE orders TYPE string \
    DEFAULT 'pending' \
    ASSERT $value IN ['pending', 'paid', 'failed', 'refunded'];
DEFINE FIELD payment_method ON TABLE orders TYPE string \
    DEFAULT 'cash_on_delivery' \
    ASSERT $value IN ['cash_on_delivery', 'stripe', 'paypal'];
DEFINE FIELD shipping_address ON TABLE orders TYPE string;
DEFINE FIELD created_at ON TABLE orders TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE orders TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_order_no ON TABLE orders COLUMNS order_no UNIQUE;
DEFINE INDEX idx_order_user ON TABLE orders COLUMNS user_id;

DEFINE TABLE order_item SCHEMAFULL;
DEFINE FIELD order_id ON TABLE order_item TYPE string;
DEFINE FIELD product_id ON TABLE order_item TYPE string;
DEFINE FIELD quantity ON TABLE order_item TYPE int;
DEFINE FIELD price ON TABLE order_item TYPE float;
DEFINE INDEX idx_order_item_order ON TABLE order_item \
    COLUMNS order_id;

DEFINE TABLE payment SCHEMAFULL;
DEFINE FIELD order_id ON TABLE payment TYPE string;
DEFINE FIELD amount ON TABLE payment TYPE float;
DEFINE FIELD status ON TABLE payment TYPE string \
    DEFAULT 'pending' \
    ASSERT $value IN ['pending', 'paid', 'failed', 'refunded'];
DEFINE FIELD transaction_id ON TABLE payment TYPE option<string>;
DEFINE FIELD created_at ON TABLE payment TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE payment TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_payment_order ON TABLE payment COLUMNS order_id;

DEFINE TABLE review SCHEMAFULL;
DEFINE FIELD product_id ON TABLE review TYPE string;
DEFINE FIELD user_id ON TABLE review TYPE string;
DEFINE FIELD rating ON TABLE review TYPE float \
    ASSERT $value >= 0 AND $value <= 5;
DEFINE FIELD comment ON TABLE review TYPE option<string>;
DEFINE FIELD created_at ON TABLE review TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE review TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_review_product ON TABLE review COLUMNS product_id;
DEFINE INDEX idx_review_user ON TABLE review COLUMNS user_id;
";

// -----------------------------------------------------------------------
// Schema v2 — seed the role hierarchy
// -----------------------------------------------------------------------

// Fixed record UUIDs so the seed is stable across environments.
const SEED_ROLES_V2: &str = "\
CREATE type::record('role', '1d8f4a02-0e64-4f3a-9b6e-62d1c0a7d101') \
    SET name = 'admin', level = 0;
CREATE type::record('role', '2c9e5b13-1f75-4a4b-8c7f-73e2d1b8e202') \
    SET name = 'vendor', level = 1;
CREATE type::record('role', '3daf6c24-2a86-4b5c-9d8a-84f3e2c9f303') \
    SET name = 'customer', level = 2;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }

    #[test]
    fn seed_covers_every_role() {
        for name in ["admin", "vendor", "customer"] {
            assert!(SEED_ROLES_V2.contains(name));
        }
    }
}
