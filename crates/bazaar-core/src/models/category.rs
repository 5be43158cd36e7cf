//! Category domain model.
//!
//! Categories form a forest via the self-referential `parent_id`.
//! The write path guards the acyclicity invariant (see
//! [`crate::tree`]); the read-side tree builder is lenient about
//! dangling parents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    /// `None` for top-level categories.
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub slug: String,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub slug: Option<String>,
    /// `Some(Some(id))` = reparent, `Some(None)` = make root,
    /// `None` = no change.
    pub parent_id: Option<Option<Uuid>>,
}
