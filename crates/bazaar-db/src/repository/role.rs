//! SurrealDB implementation of [`RoleRepository`].

use bazaar_core::error::BazaarResult;
use bazaar_core::models::role::{ResolvedRole, Role, RoleName};
use bazaar_core::repository::RoleRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct RoleRow {
    name: String,
    level: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct RoleRowWithId {
    record_id: String,
    name: String,
    level: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_role_name(s: &str) -> Result<RoleName, DbError> {
    s.parse()
        .map_err(|_| DbError::Migration(format!("unknown role name: {s}")))
}

impl RoleRow {
    fn into_role(self, id: Uuid) -> Result<Role, DbError> {
        Ok(Role {
            id,
            name: parse_role_name(&self.name)?,
            level: self.level as u8,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl RoleRowWithId {
    fn try_into_role(self) -> Result<Role, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(Role {
            id,
            name: parse_role_name(&self.name)?,
            level: self.level as u8,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Projection used when resolving a user's role.
#[derive(Debug, SurrealValue)]
struct UserRoleRow {
    role_id: String,
}

/// SurrealDB implementation of the Role repository.
///
/// Roles are seeded by migration; this repository is read-only.
#[derive(Clone)]
pub struct SurrealRoleRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRoleRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RoleRepository for SurrealRoleRepository<C> {
    async fn get_by_id(&self, id: Uuid) -> BazaarResult<Role> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('role', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            id: id_str,
        })?;

        Ok(row.into_role(id)?)
    }

    async fn get_by_name(&self, name: RoleName) -> BazaarResult<Role> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role \
                 WHERE name = $name",
            )
            .bind(("name", name.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            id: format!("name={name}"),
        })?;

        Ok(row.try_into_role()?)
    }

    async fn list(&self) -> BazaarResult<Vec<Role>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role \
                 ORDER BY level ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;

        rows.into_iter()
            .map(|row| row.try_into_role())
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn resolve_role(&self, user_id: Uuid) -> BazaarResult<ResolvedRole> {
        let user_id_str = user_id.to_string();

        let mut result = self
            .db
            .query("SELECT role_id FROM type::record('user', $id)")
            .bind(("id", user_id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: user_id_str,
        })?;

        let role_id = Uuid::parse_str(&row.role_id)
            .map_err(|e| DbError::Migration(format!("invalid role UUID: {e}")))?;

        let role = self.get_by_id(role_id).await?;
        Ok(ResolvedRole {
            name: role.name,
            level: role.level,
        })
    }
}
