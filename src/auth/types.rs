use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed role set. A user's role is always scoped to a franchise through the
/// `user_roles` join table; the token carries the role for the user's home
/// franchise.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperUser,
    Admin,
    Owner,
    Manager,
    Cashier,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperUser => "super_user",
            Role::Admin => "admin",
            Role::Owner => "owner",
            Role::Manager => "manager",
            Role::Cashier => "cashier",
            Role::Customer => "customer",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Role::SuperUser => 5,
            Role::Admin => 4,
            Role::Owner => 3,
            Role::Manager => 2,
            Role::Cashier => 1,
            Role::Customer => 0,
        }
    }

    /// Whether a holder of `self` clears the bar set by `required`.
    pub fn satisfies(&self, required: Role) -> bool {
        self.rank() >= required.rank()
    }
}

impl TryFrom<&str> for Role {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "super_user" => Ok(Role::SuperUser),
            "admin" => Ok(Role::Admin),
            "owner" => Ok(Role::Owner),
            "manager" => Ok(Role::Manager),
            "cashier" => Ok(Role::Cashier),
            "customer" => Ok(Role::Customer),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access-token claims. Self-describing: any consumer holding the shared
/// secret can verify a token without calling back into this service.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub role: Role,
    pub exp: usize, // expiry (unix)
    pub iat: usize, // issued at
}

/// Public projection of an authenticated user, returned by the login
/// endpoint alongside the token.
#[derive(Debug, Clone, Serialize)]
pub struct UserIdentity {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

pub trait RolePolicy {
    fn required() -> Role;
}

pub struct AdminUp;

impl RolePolicy for AdminUp {
    fn required() -> Role {
        Role::Admin
    }
}

pub struct ManagerUp;

impl RolePolicy for ManagerUp {
    fn required() -> Role {
        Role::Manager
    }
}

pub struct AnyRole;

impl RolePolicy for AnyRole {
    fn required() -> Role {
        Role::Customer
    }
}
