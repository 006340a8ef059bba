use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Set};

use super::{DaoBase, DaoResult};
use crate::db::entities::{franchise, prelude::Franchise};

#[derive(Clone)]
pub struct FranchiseDao {
    db: DatabaseConnection,
}

impl DaoBase for FranchiseDao {
    type Entity = Franchise;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl FranchiseDao {
    pub async fn find_by_reg_number(&self, reg_number: &str) -> DaoResult<Option<franchise::Model>> {
        let reg_number = reg_number.to_string();
        self.find(1, 1, None, move |query| {
            query.filter(franchise::Column::RegNumber.eq(reg_number))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn create_franchise(
        &self,
        name: &str,
        reg_number: &str,
        vat_registered: bool,
        vat_number: Option<&str>,
        address: &str,
    ) -> DaoResult<franchise::Model> {
        let model = franchise::ActiveModel {
            name: Set(name.to_string()),
            reg_number: Set(reg_number.to_string()),
            vat_registered: Set(vat_registered),
            vat_number: Set(vat_number.map(str::to_string)),
            address: Set(address.to_string()),
            ..Default::default()
        };
        self.create(model).await
    }
}
