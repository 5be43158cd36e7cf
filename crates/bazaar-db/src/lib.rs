//! Bazaar Database — SurrealDB connection management, schema
//! migrations, and repository implementations for the `bazaar-core`
//! traits.
//!
//! Repositories are generic over [`surrealdb::Connection`] so the
//! same code runs against the ws engine in production and the
//! in-memory engine in integration tests.

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::run_migrations;
