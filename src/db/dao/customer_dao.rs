use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult, PaginatedResponse};
use crate::db::entities::{customer, prelude::Customer};

#[derive(Clone)]
pub struct CustomerDao {
    db: DatabaseConnection,
}

impl DaoBase for CustomerDao {
    type Entity = Customer;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl CustomerDao {
    pub async fn list_for_franchise(
        &self,
        franchise_id: &Uuid,
        page: u64,
        page_size: u64,
    ) -> DaoResult<PaginatedResponse<customer::Model>> {
        let franchise_id = *franchise_id;
        self.find(page, page_size, None, move |query| {
            query.filter(customer::Column::FranchiseId.eq(franchise_id))
        })
        .await
    }

    pub async fn create_customer(
        &self,
        franchise_id: &Uuid,
        store_id: &Uuid,
        name: &str,
        email: Option<&str>,
        phone_e164: Option<&str>,
        status: &str,
    ) -> DaoResult<customer::Model> {
        let model = customer::ActiveModel {
            franchise_id: Set(*franchise_id),
            store_id: Set(*store_id),
            name: Set(name.to_string()),
            email: Set(email.map(str::to_string)),
            phone_e164: Set(phone_e164.map(str::to_string)),
            status: Set(status.to_string()),
            ..Default::default()
        };
        self.create(model).await
    }
}
