//! Database-specific error types and conversions.

use bazaar_core::error::BazaarError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("{entity} already exists")]
    Conflict { entity: String },
}

impl DbError {
    /// Translate a write failure into [`DbError::Conflict`] when the
    /// underlying cause is a unique index violation.
    ///
    /// Application-level existence checks are only a fast path; the
    /// unique index is the final authority on races, and its rejection
    /// must surface as a conflict rather than a generic database
    /// error.
    pub fn conflict_or_surreal(err: surrealdb::Error, entity: &str) -> Self {
        let message = err.to_string();
        if message.contains("already contains") {
            DbError::Conflict {
                entity: entity.into(),
            }
        } else {
            DbError::Surreal(err)
        }
    }
}

impl From<DbError> for BazaarError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => BazaarError::NotFound { entity, id },
            DbError::Conflict { entity } => BazaarError::AlreadyExists { entity },
            other => BazaarError::Database(other.to_string()),
        }
    }
}
