//! Role domain model.
//!
//! Roles form a closed hierarchy with a numeric privilege level:
//! a lower level means higher privilege (admin = 0). All privilege
//! comparisons go through [`RoleName::level`] — never through string
//! equality.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The closed set of role names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    Admin,
    Vendor,
    Customer,
}

impl RoleName {
    /// Numeric privilege level. Lower level ⇒ higher privilege.
    pub fn level(self) -> u8 {
        match self {
            RoleName::Admin => 0,
            RoleName::Vendor => 1,
            RoleName::Customer => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoleName::Admin => "admin",
            RoleName::Vendor => "vendor",
            RoleName::Customer => "customer",
        }
    }

    /// True if this role has at least the privilege of `other`.
    pub fn outranks_or_equals(self, other: RoleName) -> bool {
        self.level() <= other.level()
    }
}

impl PartialOrd for RoleName {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Total order by privilege: `Admin < Vendor < Customer` (most
/// privileged first, matching the level ordering).
impl Ord for RoleName {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.level().cmp(&other.level())
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(RoleName::Admin),
            "vendor" => Ok(RoleName::Vendor),
            "customer" => Ok(RoleName::Customer),
            other => Err(format!("unknown role name: {other}")),
        }
    }
}

/// A stored role row. One row exists per [`RoleName`], seeded by
/// migration; `level` is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: RoleName,
    pub level: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The resolved role of an authenticated user (§ identity resolution).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ResolvedRole {
    pub name: RoleName,
    pub level: u8,
}

impl From<RoleName> for ResolvedRole {
    fn from(name: RoleName) -> Self {
        Self {
            name,
            level: name.level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered_by_privilege() {
        assert_eq!(RoleName::Admin.level(), 0);
        assert_eq!(RoleName::Vendor.level(), 1);
        assert_eq!(RoleName::Customer.level(), 2);
        assert!(RoleName::Admin < RoleName::Vendor);
        assert!(RoleName::Vendor < RoleName::Customer);
    }

    #[test]
    fn outranks_is_reflexive_and_follows_levels() {
        assert!(RoleName::Admin.outranks_or_equals(RoleName::Customer));
        assert!(RoleName::Vendor.outranks_or_equals(RoleName::Vendor));
        assert!(!RoleName::Customer.outranks_or_equals(RoleName::Vendor));
    }

    #[test]
    fn parse_roundtrip() {
        for name in [RoleName::Admin, RoleName::Vendor, RoleName::Customer] {
            assert_eq!(name.as_str().parse::<RoleName>().unwrap(), name);
        }
        assert!("superuser".parse::<RoleName>().is_err());
    }
}
