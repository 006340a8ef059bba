use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::store::{STATUS_ACTIVE, STATUS_INACTIVE};
use crate::db::dao::{CustomerDao, DaoBase, PaginatedResponse, StoreDao};
use crate::db::entities::customer;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct NewCustomer {
    pub store_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone_e164: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_e164: Option<String>,
    pub status: Option<String>,
}

pub struct CustomerService {
    customers: CustomerDao,
    stores: StoreDao,
}

impl CustomerService {
    pub fn new(customers: CustomerDao, stores: StoreDao) -> Self {
        Self { customers, stores }
    }

    pub async fn create(
        &self,
        franchise_id: Uuid,
        req: NewCustomer,
    ) -> Result<customer::Model, AppError> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("customer name is required"));
        }

        let store = self.stores.find_by_id(req.store_id).await?;
        if store.franchise_id != franchise_id {
            return Err(AppError::bad_request(
                "store belongs to a different franchise",
            ));
        }

        let email = req.email.as_deref().map(|raw| raw.trim().to_lowercase());
        let created = self
            .customers
            .create_customer(
                &franchise_id,
                &req.store_id,
                name,
                email.as_deref(),
                req.phone_e164.as_deref(),
                STATUS_ACTIVE,
            )
            .await?;
        info!(customer_id = %created.id, franchise_id = %franchise_id, "created customer");
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<customer::Model, AppError> {
        Ok(self.customers.find_by_id(id).await?)
    }

    pub async fn list(
        &self,
        franchise_id: Uuid,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<customer::Model>, AppError> {
        Ok(self
            .customers
            .list_for_franchise(&franchise_id, page, page_size)
            .await?)
    }

    pub async fn update(
        &self,
        id: Uuid,
        patch: CustomerPatch,
    ) -> Result<customer::Model, AppError> {
        if let Some(status) = patch.status.as_deref() {
            if status != STATUS_ACTIVE && status != STATUS_INACTIVE {
                return Err(AppError::bad_request("unknown customer status"));
            }
        }

        Ok(self
            .customers
            .update(id, move |active| {
                if let Some(name) = patch.name {
                    active.name = sea_orm::Set(name);
                }
                if let Some(email) = patch.email {
                    active.email = sea_orm::Set(Some(email.trim().to_lowercase()));
                }
                if let Some(phone) = patch.phone_e164 {
                    active.phone_e164 = sea_orm::Set(Some(phone));
                }
                if let Some(status) = patch.status {
                    active.status = sea_orm::Set(status);
                }
            })
            .await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<Uuid, AppError> {
        Ok(self.customers.delete(id).await?)
    }
}
