use sea_orm::DatabaseConnection;

use super::{
    CategoryDao, CustomerDao, DaoBase, FranchiseDao, InvoiceDao, InvoiceLineDao, ItemDao,
    PaymentDao, StoreDao, UserDao, UserRoleDao,
};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn user(&self) -> UserDao {
        DaoBase::new(&self.db)
    }

    pub fn user_role(&self) -> UserRoleDao {
        DaoBase::new(&self.db)
    }

    pub fn franchise(&self) -> FranchiseDao {
        DaoBase::new(&self.db)
    }

    pub fn store(&self) -> StoreDao {
        DaoBase::new(&self.db)
    }

    pub fn category(&self) -> CategoryDao {
        DaoBase::new(&self.db)
    }

    pub fn item(&self) -> ItemDao {
        DaoBase::new(&self.db)
    }

    pub fn customer(&self) -> CustomerDao {
        DaoBase::new(&self.db)
    }

    pub fn invoice(&self) -> InvoiceDao {
        DaoBase::new(&self.db)
    }

    pub fn invoice_line(&self) -> InvoiceLineDao {
        DaoBase::new(&self.db)
    }

    pub fn payment(&self) -> PaymentDao {
        DaoBase::new(&self.db)
    }
}
