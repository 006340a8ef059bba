use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::jwt::JwtKeys;
use crate::auth::store::DbCredentialStore;
use crate::config::{AuthConfig, InvoicingConfig};
use crate::db::dao::DaoContext;

use super::auth_service::AuthService;
use super::catalog_service::CatalogService;
use super::customer_service::CustomerService;
use super::franchise_service::FranchiseService;
use super::invoice_service::InvoiceService;
use super::user_service::UserService;

/// Builds request-scoped services over a shared connection pool. Services
/// are cheap to construct, so handlers ask for a fresh one per request.
#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
        }
    }

    pub fn auth(&self, jwt: &JwtKeys, cfg: &AuthConfig) -> AuthService {
        let store = DbCredentialStore::new(self.daos.user(), self.daos.user_role());
        AuthService::new(
            Arc::new(store),
            self.daos.user(),
            jwt.clone(),
            cfg.access_ttl_secs,
        )
    }

    pub fn users(&self) -> UserService {
        UserService::new(
            self.daos.user(),
            self.daos.user_role(),
            self.daos.franchise(),
        )
    }

    pub fn franchises(&self) -> FranchiseService {
        FranchiseService::new(self.daos.franchise(), self.daos.store())
    }

    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(self.daos.franchise(), self.daos.category(), self.daos.item())
    }

    pub fn customers(&self) -> CustomerService {
        CustomerService::new(self.daos.customer(), self.daos.store())
    }

    pub fn invoices(&self, cfg: &InvoicingConfig) -> InvoiceService {
        InvoiceService::new(
            self.daos.franchise(),
            self.daos.store(),
            self.daos.customer(),
            self.daos.item(),
            self.daos.invoice(),
            self.daos.invoice_line(),
            self.daos.payment(),
            cfg.vat_rate_bps,
        )
    }
}
