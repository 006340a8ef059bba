pub mod bootstrap;
pub mod jwt;
pub mod password;
pub mod store;
mod types;

pub use types::{AdminUp, AnyRole, Claims, ManagerUp, Role, RolePolicy, UserIdentity};
