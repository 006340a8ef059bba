use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult, PaginatedResponse};
use crate::db::entities::{
    category, item,
    prelude::{Category, Item},
};

#[derive(Clone)]
pub struct CategoryDao {
    db: DatabaseConnection,
}

impl DaoBase for CategoryDao {
    type Entity = Category;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl CategoryDao {
    pub async fn list_for_franchise(
        &self,
        franchise_id: &Uuid,
        page: u64,
        page_size: u64,
    ) -> DaoResult<PaginatedResponse<category::Model>> {
        let franchise_id = *franchise_id;
        self.find(page, page_size, None, move |query| {
            query.filter(category::Column::FranchiseId.eq(franchise_id))
        })
        .await
    }

    pub async fn create_category(
        &self,
        franchise_id: &Uuid,
        name: &str,
    ) -> DaoResult<category::Model> {
        let model = category::ActiveModel {
            franchise_id: Set(*franchise_id),
            name: Set(name.to_string()),
            ..Default::default()
        };
        self.create(model).await
    }
}

#[derive(Clone)]
pub struct ItemDao {
    db: DatabaseConnection,
}

impl DaoBase for ItemDao {
    type Entity = Item;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl ItemDao {
    pub async fn find_by_sku(&self, sku: &str) -> DaoResult<Option<item::Model>> {
        let sku = sku.to_string();
        self.find(1, 1, None, move |query| {
            query.filter(item::Column::Sku.eq(sku))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn list_for_franchise(
        &self,
        franchise_id: &Uuid,
        category_id: Option<&Uuid>,
        page: u64,
        page_size: u64,
    ) -> DaoResult<PaginatedResponse<item::Model>> {
        let franchise_id = *franchise_id;
        let category_id = category_id.copied();
        self.find(page, page_size, None, move |query| {
            let query = query.filter(item::Column::FranchiseId.eq(franchise_id));
            match category_id {
                Some(category_id) => query.filter(item::Column::CategoryId.eq(category_id)),
                None => query,
            }
        })
        .await
    }

    pub async fn create_item(
        &self,
        franchise_id: &Uuid,
        category_id: &Uuid,
        sku: &str,
        name: &str,
        price_cents: i64,
    ) -> DaoResult<item::Model> {
        let model = item::ActiveModel {
            franchise_id: Set(*franchise_id),
            category_id: Set(*category_id),
            sku: Set(sku.to_string()),
            name: Set(name.to_string()),
            price_cents: Set(price_cents),
            ..Default::default()
        };
        self.create(model).await
    }
}
