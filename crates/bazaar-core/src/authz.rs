//! Authorization core — ownership resolution for vendor-scoped
//! resource mutation.
//!
//! Every mutable catalog resource ultimately belongs to a vendor:
//! answers reference their vendor directly, specifications and
//! warranties reach it through their product. [`authorize_mutation`]
//! walks that chain once, via a single tagged dispatch, instead of
//! per-entity checks scattered across handlers.
//!
//! A broken chain (e.g. the parent product was deleted) is reported
//! as `NotFound`, never `AuthorizationDenied` — ownership cannot be
//! evaluated without the parent.

use std::future::Future;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{BazaarError, BazaarResult};
use crate::models::role::RoleName;

/// The authenticated actor making a request.
///
/// Always passed explicitly into ownership checks; never ambient
/// state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: RoleName,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == RoleName::Admin
    }
}

/// A reference to a resource whose mutation requires vendor
/// ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceRef {
    Vendor(Uuid),
    Product(Uuid),
    Specification(Uuid),
    Warranty(Uuid),
    Answer(Uuid),
}

/// The owner-side facts needed for an ownership decision.
#[derive(Debug, Clone, Copy)]
pub struct VendorOwner {
    pub vendor_id: Uuid,
    pub user_id: Uuid,
    pub is_active: bool,
}

/// Seam implemented by the database layer: one point read per hop of
/// the ownership chain. Every method fails with `NotFound` when the
/// referenced record is missing.
pub trait OwnershipLookup: Send + Sync {
    fn vendor_owner(
        &self,
        vendor_id: Uuid,
    ) -> impl Future<Output = BazaarResult<VendorOwner>> + Send;
    fn product_vendor(
        &self,
        product_id: Uuid,
    ) -> impl Future<Output = BazaarResult<Uuid>> + Send;
    fn specification_product(
        &self,
        specification_id: Uuid,
    ) -> impl Future<Output = BazaarResult<Uuid>> + Send;
    fn warranty_product(
        &self,
        warranty_id: Uuid,
    ) -> impl Future<Output = BazaarResult<Uuid>> + Send;
    fn answer_vendor(
        &self,
        answer_id: Uuid,
    ) -> impl Future<Output = BazaarResult<Uuid>> + Send;
}

/// Walk the reference chain from `resource` up to its owning vendor.
pub async fn resolve_owning_vendor<L: OwnershipLookup>(
    lookup: &L,
    resource: ResourceRef,
) -> BazaarResult<VendorOwner> {
    let vendor_id = match resource {
        ResourceRef::Vendor(id) => id,
        ResourceRef::Product(id) => lookup.product_vendor(id).await?,
        ResourceRef::Specification(id) => {
            let product_id = lookup.specification_product(id).await?;
            lookup.product_vendor(product_id).await?
        }
        ResourceRef::Warranty(id) => {
            let product_id = lookup.warranty_product(id).await?;
            lookup.product_vendor(product_id).await?
        }
        ResourceRef::Answer(id) => lookup.answer_vendor(id).await?,
    };
    lookup.vendor_owner(vendor_id).await
}

/// Decide whether `principal` may mutate `resource`.
///
/// Admins may mutate anything, without any lookups. Everyone else
/// must be the owning vendor's user, and that vendor must be active.
pub async fn authorize_mutation<L: OwnershipLookup>(
    lookup: &L,
    principal: &Principal,
    resource: ResourceRef,
) -> BazaarResult<()> {
    if principal.is_admin() {
        return Ok(());
    }

    let owner = resolve_owning_vendor(lookup, resource).await?;

    if owner.user_id == principal.user_id && owner.is_active {
        Ok(())
    } else {
        Err(BazaarError::AuthorizationDenied {
            reason: "resource is owned by another vendor".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory ownership graph for policy tests.
    #[derive(Default)]
    struct FakeLookup {
        vendors: HashMap<Uuid, VendorOwner>,
        product_vendor: HashMap<Uuid, Uuid>,
        spec_product: HashMap<Uuid, Uuid>,
        warranty_product: HashMap<Uuid, Uuid>,
        answer_vendor: HashMap<Uuid, Uuid>,
    }

    fn missing(entity: &str, id: Uuid) -> BazaarError {
        BazaarError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    impl OwnershipLookup for FakeLookup {
        async fn vendor_owner(&self, vendor_id: Uuid) -> BazaarResult<VendorOwner> {
            self.vendors
                .get(&vendor_id)
                .copied()
                .ok_or_else(|| missing("vendor", vendor_id))
        }

        async fn product_vendor(&self, product_id: Uuid) -> BazaarResult<Uuid> {
            self.product_vendor
                .get(&product_id)
                .copied()
                .ok_or_else(|| missing("product", product_id))
        }

        async fn specification_product(&self, specification_id: Uuid) -> BazaarResult<Uuid> {
            self.spec_product
                .get(&specification_id)
                .copied()
                .ok_or_else(|| missing("specification", specification_id))
        }

        async fn warranty_product(&self, warranty_id: Uuid) -> BazaarResult<Uuid> {
            self.warranty_product
                .get(&warranty_id)
                .copied()
                .ok_or_else(|| missing("warranty", warranty_id))
        }

        async fn answer_vendor(&self, answer_id: Uuid) -> BazaarResult<Uuid> {
            self.answer_vendor
                .get(&answer_id)
                .copied()
                .ok_or_else(|| missing("answer", answer_id))
        }
    }

    struct World {
        lookup: FakeLookup,
        owner: Principal,
        other: Principal,
        admin: Principal,
        vendor_id: Uuid,
        product_id: Uuid,
        spec_id: Uuid,
        warranty_id: Uuid,
        answer_id: Uuid,
    }

    fn world() -> World {
        let owner_user = Uuid::new_v4();
        let vendor_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();
        let spec_id = Uuid::new_v4();
        let warranty_id = Uuid::new_v4();
        let answer_id = Uuid::new_v4();

        let mut lookup = FakeLookup::default();
        lookup.vendors.insert(
            vendor_id,
            VendorOwner {
                vendor_id,
                user_id: owner_user,
                is_active: true,
            },
        );
        lookup.product_vendor.insert(product_id, vendor_id);
        lookup.spec_product.insert(spec_id, product_id);
        lookup.warranty_product.insert(warranty_id, product_id);
        lookup.answer_vendor.insert(answer_id, vendor_id);

        World {
            lookup,
            owner: Principal {
                user_id: owner_user,
                role: RoleName::Vendor,
            },
            other: Principal {
                user_id: Uuid::new_v4(),
                role: RoleName::Vendor,
            },
            admin: Principal {
                user_id: Uuid::new_v4(),
                role: RoleName::Admin,
            },
            vendor_id,
            product_id,
            spec_id,
            warranty_id,
            answer_id,
        }
    }

    #[tokio::test]
    async fn owner_may_mutate_along_the_whole_chain() {
        let w = world();
        for resource in [
            ResourceRef::Vendor(w.vendor_id),
            ResourceRef::Product(w.product_id),
            ResourceRef::Specification(w.spec_id),
            ResourceRef::Warranty(w.warranty_id),
            ResourceRef::Answer(w.answer_id),
        ] {
            authorize_mutation(&w.lookup, &w.owner, resource)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn other_vendor_is_denied() {
        let w = world();
        for resource in [
            ResourceRef::Product(w.product_id),
            ResourceRef::Specification(w.spec_id),
            ResourceRef::Answer(w.answer_id),
        ] {
            let err = authorize_mutation(&w.lookup, &w.other, resource)
                .await
                .unwrap_err();
            assert!(matches!(err, BazaarError::AuthorizationDenied { .. }));
        }
    }

    #[tokio::test]
    async fn admin_bypasses_ownership() {
        let w = world();
        // Even for a resource that does not exist: no lookups happen.
        authorize_mutation(&w.lookup, &w.admin, ResourceRef::Product(Uuid::new_v4()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn inactive_vendor_is_denied_even_for_its_owner() {
        let mut w = world();
        w.lookup.vendors.get_mut(&w.vendor_id).unwrap().is_active = false;
        let err = authorize_mutation(&w.lookup, &w.owner, ResourceRef::Product(w.product_id))
            .await
            .unwrap_err();
        assert!(matches!(err, BazaarError::AuthorizationDenied { .. }));
    }

    #[tokio::test]
    async fn broken_chain_is_not_found_not_forbidden() {
        let mut w = world();
        // Delete the product out from under its specification.
        w.lookup.product_vendor.clear();
        let err = authorize_mutation(&w.lookup, &w.other, ResourceRef::Specification(w.spec_id))
            .await
            .unwrap_err();
        assert!(matches!(err, BazaarError::NotFound { .. }));
    }

    #[tokio::test]
    async fn missing_resource_is_not_found() {
        let w = world();
        let err = authorize_mutation(&w.lookup, &w.owner, ResourceRef::Warranty(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, BazaarError::NotFound { .. }));
    }

    #[tokio::test]
    async fn resolve_walks_spec_to_vendor() {
        let w = world();
        let owner = resolve_owning_vendor(&w.lookup, ResourceRef::Specification(w.spec_id))
            .await
            .unwrap();
        assert_eq!(owner.vendor_id, w.vendor_id);
        assert_eq!(owner.user_id, w.owner.user_id);
    }
}
