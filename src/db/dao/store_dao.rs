use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult, PaginatedResponse};
use crate::db::entities::{prelude::Store, store};

#[derive(Clone)]
pub struct StoreDao {
    db: DatabaseConnection,
}

impl DaoBase for StoreDao {
    type Entity = Store;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl StoreDao {
    pub async fn find_by_code(&self, code: &str) -> DaoResult<Option<store::Model>> {
        let code = code.to_string();
        self.find(1, 1, None, move |query| {
            query.filter(store::Column::Code.eq(code))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn list_for_franchise(
        &self,
        franchise_id: &Uuid,
        page: u64,
        page_size: u64,
    ) -> DaoResult<PaginatedResponse<store::Model>> {
        let franchise_id = *franchise_id;
        self.find(page, page_size, None, move |query| {
            query.filter(store::Column::FranchiseId.eq(franchise_id))
        })
        .await
    }

    pub async fn create_store(
        &self,
        franchise_id: &Uuid,
        name: &str,
        code: &str,
        address: &str,
        timezone: &str,
    ) -> DaoResult<store::Model> {
        let model = store::ActiveModel {
            franchise_id: Set(*franchise_id),
            name: Set(name.to_string()),
            code: Set(code.to_string()),
            address: Set(address.to_string()),
            timezone: Set(timezone.to_string()),
            ..Default::default()
        };
        self.create(model).await
    }
}
