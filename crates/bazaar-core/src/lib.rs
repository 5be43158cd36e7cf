//! Bazaar Core — domain models, repository traits, and the
//! authorization core (role hierarchy, ownership resolution,
//! category tree integrity).
//!
//! This crate has no database dependency. Persistence seams are
//! expressed as async repository traits implemented by `bazaar-db`.

pub mod authz;
pub mod error;
pub mod models;
pub mod repository;
pub mod tree;

pub use error::{BazaarError, BazaarResult};
