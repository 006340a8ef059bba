pub mod auth_service;
pub mod catalog_service;
pub mod context;
pub mod customer_service;
pub mod franchise_service;
pub mod invoice_service;
pub mod user_service;

pub use context::ServiceContext;
