use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::db::dao::{CategoryDao, DaoBase, FranchiseDao, ItemDao, PaginatedResponse};
use crate::db::entities::{category, item};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct NewItem {
    pub category_id: Uuid,
    pub sku: String,
    pub name: String,
    pub price_cents: i64,
}

#[derive(Debug, Deserialize, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub price_cents: Option<i64>,
}

pub struct CatalogService {
    franchises: FranchiseDao,
    categories: CategoryDao,
    items: ItemDao,
}

impl CatalogService {
    pub fn new(franchises: FranchiseDao, categories: CategoryDao, items: ItemDao) -> Self {
        Self {
            franchises,
            categories,
            items,
        }
    }

    pub async fn create_category(
        &self,
        franchise_id: Uuid,
        name: &str,
    ) -> Result<category::Model, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("category name is required"));
        }
        self.franchises.find_by_id(franchise_id).await?;

        let created = self.categories.create_category(&franchise_id, name).await?;
        info!(category_id = %created.id, franchise_id = %franchise_id, "created category");
        Ok(created)
    }

    pub async fn list_categories(
        &self,
        franchise_id: Uuid,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<category::Model>, AppError> {
        Ok(self
            .categories
            .list_for_franchise(&franchise_id, page, page_size)
            .await?)
    }

    pub async fn rename_category(&self, id: Uuid, name: &str) -> Result<category::Model, AppError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::bad_request("category name is required"));
        }

        Ok(self
            .categories
            .update(id, move |active| {
                active.name = sea_orm::Set(name);
            })
            .await?)
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<Uuid, AppError> {
        Ok(self.categories.delete(id).await?)
    }

    pub async fn create_item(
        &self,
        franchise_id: Uuid,
        req: NewItem,
    ) -> Result<item::Model, AppError> {
        let sku = req.sku.trim().to_uppercase();
        let name = req.name.trim();
        if sku.is_empty() || name.is_empty() {
            return Err(AppError::bad_request("item sku and name are required"));
        }
        if req.price_cents < 0 {
            return Err(AppError::bad_request("item price cannot be negative"));
        }

        let category = self.categories.find_by_id(req.category_id).await?;
        if category.franchise_id != franchise_id {
            return Err(AppError::bad_request(
                "category belongs to a different franchise",
            ));
        }

        if self.items.find_by_sku(&sku).await?.is_some() {
            return Err(AppError::conflict("sku already in use"));
        }

        let created = self
            .items
            .create_item(&franchise_id, &req.category_id, &sku, name, req.price_cents)
            .await?;
        info!(item_id = %created.id, sku = %sku, "created item");
        Ok(created)
    }

    pub async fn get_item(&self, id: Uuid) -> Result<item::Model, AppError> {
        Ok(self.items.find_by_id(id).await?)
    }

    pub async fn list_items(
        &self,
        franchise_id: Uuid,
        category_id: Option<Uuid>,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<item::Model>, AppError> {
        Ok(self
            .items
            .list_for_franchise(&franchise_id, category_id.as_ref(), page, page_size)
            .await?)
    }

    pub async fn update_item(&self, id: Uuid, patch: ItemPatch) -> Result<item::Model, AppError> {
        if patch.price_cents.is_some_and(|price| price < 0) {
            return Err(AppError::bad_request("item price cannot be negative"));
        }

        Ok(self
            .items
            .update(id, move |active| {
                if let Some(name) = patch.name {
                    active.name = sea_orm::Set(name);
                }
                if let Some(price) = patch.price_cents {
                    active.price_cents = sea_orm::Set(price);
                }
            })
            .await?)
    }

    pub async fn delete_item(&self, id: Uuid) -> Result<Uuid, AppError> {
        Ok(self.items.delete(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::{CatalogService, NewItem};
    use crate::db::dao::DaoBase;
    use crate::db::entities::{category, item};

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn category_model(id: Uuid, franchise_id: Uuid) -> category::Model {
        category::Model {
            id,
            created_at: ts(),
            updated_at: ts(),
            franchise_id,
            name: "Bottled Water".to_string(),
        }
    }

    fn item_model(franchise_id: Uuid, category_id: Uuid, sku: &str) -> item::Model {
        item::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            updated_at: ts(),
            franchise_id,
            category_id,
            sku: sku.to_string(),
            name: "Premium Spring Water 5L".to_string(),
            price_cents: 2599,
        }
    }

    fn service(db: &sea_orm::DatabaseConnection) -> CatalogService {
        CatalogService::new(DaoBase::new(db), DaoBase::new(db), DaoBase::new(db))
    }

    #[tokio::test]
    async fn create_item_rejects_cross_franchise_category() {
        let franchise_id = Uuid::new_v4();
        let category_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![category_model(category_id, Uuid::new_v4())]])
            .into_connection();

        let err = service(&db)
            .create_item(
                franchise_id,
                NewItem {
                    category_id,
                    sku: "WATER-001".to_string(),
                    name: "Premium Spring Water 5L".to_string(),
                    price_cents: 2599,
                },
            )
            .await
            .expect_err("cross-franchise category should fail");

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_item_rejects_duplicate_sku() {
        let franchise_id = Uuid::new_v4();
        let category_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![category_model(category_id, franchise_id)]])
            .append_query_results([vec![item_model(franchise_id, category_id, "WATER-001")]])
            .into_connection();

        let err = service(&db)
            .create_item(
                franchise_id,
                NewItem {
                    category_id,
                    sku: "water-001".to_string(),
                    name: "Premium Spring Water 5L".to_string(),
                    price_cents: 2599,
                },
            )
            .await
            .expect_err("duplicate sku should fail");

        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn create_item_rejects_negative_price() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = service(&db)
            .create_item(
                Uuid::new_v4(),
                NewItem {
                    category_id: Uuid::new_v4(),
                    sku: "WATER-001".to_string(),
                    name: "Premium Spring Water 5L".to_string(),
                    price_cents: -1,
                },
            )
            .await
            .expect_err("negative price should fail");

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
