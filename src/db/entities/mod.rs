#[allow(unused_imports)]
pub mod prelude {
    pub use super::category::Entity as Category;
    pub use super::customer::Entity as Customer;
    pub use super::franchise::Entity as Franchise;
    pub use super::invoice::Entity as Invoice;
    pub use super::invoice_line::Entity as InvoiceLine;
    pub use super::item::Entity as Item;
    pub use super::payment::Entity as Payment;
    pub use super::store::Entity as Store;
    pub use super::user::Entity as User;
    pub use super::user_role::Entity as UserRole;
}

pub mod category;
pub mod customer;
pub mod franchise;
pub mod invoice;
pub mod invoice_line;
pub mod item;
pub mod payment;
pub mod store;
pub mod user;
pub mod user_role;
