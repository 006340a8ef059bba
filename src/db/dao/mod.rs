pub mod base;
pub mod base_traits;
pub mod catalog_dao;
pub mod context;
pub mod customer_dao;
pub mod error;
pub mod franchise_dao;
pub mod invoice_dao;
pub mod store_dao;
pub mod user_dao;
pub mod user_role_dao;

pub use base::{DaoBase, PaginatedResponse};
pub use base_traits::{HasCreatedAtColumn, HasIdActiveModel, TimestampedActiveModel};
pub use catalog_dao::{CategoryDao, ItemDao};
pub use context::DaoContext;
pub use customer_dao::CustomerDao;
pub use error::{DaoLayerError, DaoResult};
pub use franchise_dao::FranchiseDao;
pub use invoice_dao::{InvoiceDao, InvoiceLineDao, PaymentDao};
pub use store_dao::StoreDao;
pub use user_dao::UserDao;
pub use user_role_dao::UserRoleDao;
