//! Shared application state cloned into every handler.

use std::sync::Arc;

use bazaar_auth::{AuthConfig, AuthService};
use bazaar_db::repository::{
    SurrealBrandRepository, SurrealCategoryRepository, SurrealOwnershipLookup,
    SurrealProductRepository, SurrealQaRepository, SurrealRoleRepository,
    SurrealSpecificationRepository, SurrealUserRepository, SurrealVendorRepository,
    SurrealWarrantyRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::remote::ws::Client;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    db: Surreal<Client>,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(db: Surreal<Client>, config: &ServerConfig) -> Self {
        Self {
            db,
            auth: Arc::new(config.auth.clone()),
        }
    }

    pub fn users(&self) -> SurrealUserRepository<Client> {
        match self.auth.pepper.clone() {
            Some(pepper) => SurrealUserRepository::with_pepper(self.db.clone(), pepper),
            None => SurrealUserRepository::new(self.db.clone()),
        }
    }

    pub fn roles(&self) -> SurrealRoleRepository<Client> {
        SurrealRoleRepository::new(self.db.clone())
    }

    pub fn vendors(&self) -> SurrealVendorRepository<Client> {
        SurrealVendorRepository::new(self.db.clone())
    }

    pub fn brands(&self) -> SurrealBrandRepository<Client> {
        SurrealBrandRepository::new(self.db.clone())
    }

    pub fn categories(&self) -> SurrealCategoryRepository<Client> {
        SurrealCategoryRepository::new(self.db.clone())
    }

    pub fn products(&self) -> SurrealProductRepository<Client> {
        SurrealProductRepository::new(self.db.clone())
    }

    pub fn specifications(&self) -> SurrealSpecificationRepository<Client> {
        SurrealSpecificationRepository::new(self.db.clone())
    }

    pub fn warranties(&self) -> SurrealWarrantyRepository<Client> {
        SurrealWarrantyRepository::new(self.db.clone())
    }

    pub fn qa(&self) -> SurrealQaRepository<Client> {
        SurrealQaRepository::new(self.db.clone())
    }

    pub fn ownership(&self) -> SurrealOwnershipLookup<Client> {
        SurrealOwnershipLookup::new(self.db.clone())
    }

    pub fn auth_service(
        &self,
    ) -> AuthService<SurrealUserRepository<Client>, SurrealRoleRepository<Client>> {
        AuthService::new(self.users(), self.roles(), (*self.auth).clone())
    }
}
