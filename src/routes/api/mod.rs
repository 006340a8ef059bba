mod auth;
mod catalog;
mod customers;
mod franchises;
mod health;
mod invoices;
mod protected;
mod router;
mod users;

pub use router::router;
