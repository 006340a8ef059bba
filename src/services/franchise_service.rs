use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::db::dao::{DaoBase, FranchiseDao, PaginatedResponse, StoreDao};
use crate::db::entities::{franchise, store};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct NewFranchise {
    pub name: String,
    pub reg_number: String,
    #[serde(default)]
    pub vat_registered: bool,
    pub vat_number: Option<String>,
    pub address: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct FranchisePatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub vat_registered: Option<bool>,
    pub vat_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewStore {
    pub name: String,
    pub code: String,
    pub address: String,
    pub timezone: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct StorePatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub timezone: Option<String>,
}

pub struct FranchiseService {
    franchises: FranchiseDao,
    stores: StoreDao,
}

impl FranchiseService {
    pub fn new(franchises: FranchiseDao, stores: StoreDao) -> Self {
        Self { franchises, stores }
    }

    pub async fn create(&self, req: NewFranchise) -> Result<franchise::Model, AppError> {
        let name = require_text(&req.name, "franchise name is required")?;
        let reg_number = require_text(&req.reg_number, "registration number is required")?;
        if req.vat_registered && req.vat_number.is_none() {
            return Err(AppError::bad_request(
                "vat number is required for vat-registered franchises",
            ));
        }

        if self
            .franchises
            .find_by_reg_number(&reg_number)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("registration number already in use"));
        }

        let created = self
            .franchises
            .create_franchise(
                &name,
                &reg_number,
                req.vat_registered,
                req.vat_number.as_deref(),
                req.address.trim(),
            )
            .await?;
        info!(franchise_id = %created.id, "created franchise");
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<franchise::Model, AppError> {
        Ok(self.franchises.find_by_id(id).await?)
    }

    pub async fn list(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<franchise::Model>, AppError> {
        Ok(self
            .franchises
            .find(page, page_size, None, |query| query)
            .await?)
    }

    pub async fn update(
        &self,
        id: Uuid,
        patch: FranchisePatch,
    ) -> Result<franchise::Model, AppError> {
        Ok(self
            .franchises
            .update(id, move |active| {
                if let Some(name) = patch.name {
                    active.name = sea_orm::Set(name);
                }
                if let Some(address) = patch.address {
                    active.address = sea_orm::Set(address);
                }
                if let Some(vat_registered) = patch.vat_registered {
                    active.vat_registered = sea_orm::Set(vat_registered);
                }
                if let Some(vat_number) = patch.vat_number {
                    active.vat_number = sea_orm::Set(Some(vat_number));
                }
            })
            .await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<Uuid, AppError> {
        let deleted = self.franchises.delete(id).await?;
        info!(franchise_id = %id, "deleted franchise");
        Ok(deleted)
    }

    pub async fn create_store(
        &self,
        franchise_id: Uuid,
        req: NewStore,
    ) -> Result<store::Model, AppError> {
        let name = require_text(&req.name, "store name is required")?;
        let code = require_text(&req.code, "store code is required")?;

        self.franchises.find_by_id(franchise_id).await?;
        if self.stores.find_by_code(&code).await?.is_some() {
            return Err(AppError::conflict("store code already in use"));
        }

        let created = self
            .stores
            .create_store(
                &franchise_id,
                &name,
                &code,
                req.address.trim(),
                req.timezone.trim(),
            )
            .await?;
        info!(store_id = %created.id, franchise_id = %franchise_id, "created store");
        Ok(created)
    }

    pub async fn get_store(&self, id: Uuid) -> Result<store::Model, AppError> {
        Ok(self.stores.find_by_id(id).await?)
    }

    pub async fn list_stores(
        &self,
        franchise_id: Uuid,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<store::Model>, AppError> {
        self.franchises.find_by_id(franchise_id).await?;
        Ok(self
            .stores
            .list_for_franchise(&franchise_id, page, page_size)
            .await?)
    }

    pub async fn update_store(&self, id: Uuid, patch: StorePatch) -> Result<store::Model, AppError> {
        Ok(self
            .stores
            .update(id, move |active| {
                if let Some(name) = patch.name {
                    active.name = sea_orm::Set(name);
                }
                if let Some(address) = patch.address {
                    active.address = sea_orm::Set(address);
                }
                if let Some(timezone) = patch.timezone {
                    active.timezone = sea_orm::Set(timezone);
                }
            })
            .await?)
    }

    pub async fn delete_store(&self, id: Uuid) -> Result<Uuid, AppError> {
        Ok(self.stores.delete(id).await?)
    }
}

fn require_text(raw: &str, message: &'static str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request(message));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::{FranchiseService, NewFranchise, NewStore};
    use crate::db::dao::DaoBase;
    use crate::db::entities::{franchise, store};

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn franchise_model(id: Uuid, reg_number: &str) -> franchise::Model {
        franchise::Model {
            id,
            created_at: ts(),
            updated_at: ts(),
            name: "Demo Water Solutions".to_string(),
            reg_number: reg_number.to_string(),
            vat_registered: true,
            vat_number: Some("VAT-4820103948".to_string()),
            address: "1 Main Road, Cape Town".to_string(),
        }
    }

    fn store_model(franchise_id: Uuid, code: &str) -> store::Model {
        store::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            updated_at: ts(),
            franchise_id,
            name: "Sea Point".to_string(),
            code: code.to_string(),
            address: "12 Beach Road".to_string(),
            timezone: "Africa/Johannesburg".to_string(),
        }
    }

    fn service(db: &sea_orm::DatabaseConnection) -> FranchiseService {
        FranchiseService::new(DaoBase::new(db), DaoBase::new(db))
    }

    #[tokio::test]
    async fn create_rejects_duplicate_reg_number() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![franchise_model(Uuid::new_v4(), "REG-2020-001")]])
            .into_connection();

        let err = service(&db)
            .create(NewFranchise {
                name: "Another Water Co".to_string(),
                reg_number: "REG-2020-001".to_string(),
                vat_registered: false,
                vat_number: None,
                address: "2 Side Road".to_string(),
            })
            .await
            .expect_err("duplicate reg number should fail");

        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn create_requires_vat_number_when_vat_registered() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = service(&db)
            .create(NewFranchise {
                name: "Another Water Co".to_string(),
                reg_number: "REG-2020-002".to_string(),
                vat_registered: true,
                vat_number: None,
                address: "2 Side Road".to_string(),
            })
            .await
            .expect_err("missing vat number should fail");

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_store_rejects_duplicate_code() {
        let franchise_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![franchise_model(franchise_id, "REG-2020-001")]])
            .append_query_results([vec![store_model(franchise_id, "CPT-01")]])
            .into_connection();

        let err = service(&db)
            .create_store(
                franchise_id,
                NewStore {
                    name: "Sea Point".to_string(),
                    code: "CPT-01".to_string(),
                    address: "12 Beach Road".to_string(),
                    timezone: "Africa/Johannesburg".to_string(),
                },
            )
            .await
            .expect_err("duplicate store code should fail");

        assert_eq!(err.status(), StatusCode::CONFLICT);
    }
}
