use async_trait::async_trait;
use uuid::Uuid;

use crate::db::dao::{DaoLayerError, UserDao, UserRoleDao};
use crate::db::entities::user;

use super::Role;

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_INACTIVE: &str = "inactive";

/// What the credential validator needs to know about a user. Derived from the
/// `users` row plus the role assignment for the user's home franchise.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, thiserror::Error)]
#[error("credential store unavailable: {0}")]
pub struct StoreError(#[from] pub DaoLayerError);

/// Seam between the credential validator and persistence, so the validator
/// can be exercised against fakes. "Active" filtering happens here: inactive
/// and unknown users are indistinguishable to the caller.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_active_by_email(&self, email: &str)
    -> Result<Option<CredentialRecord>, StoreError>;
}

#[derive(Clone)]
pub struct DbCredentialStore {
    users: UserDao,
    user_roles: UserRoleDao,
}

impl DbCredentialStore {
    pub fn new(users: UserDao, user_roles: UserRoleDao) -> Self {
        Self { users, user_roles }
    }

    async fn resolve_role(&self, user: &user::Model) -> Result<Role, StoreError> {
        let assignments = self
            .user_roles
            .roles_for_tenant(&user.id, &user.franchise_id)
            .await?;

        // Highest-ranked assignment wins; unassigned users fall back to the
        // weakest role.
        let role = assignments
            .iter()
            .filter_map(|assignment| Role::try_from(assignment.role.as_str()).ok())
            .fold(None::<Role>, |best, candidate| match best {
                Some(current) if current.satisfies(candidate) => Some(current),
                _ => Some(candidate),
            })
            .unwrap_or(Role::Customer);

        Ok(role)
    }
}

#[async_trait]
impl CredentialStore for DbCredentialStore {
    async fn find_active_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CredentialRecord>, StoreError> {
        let normalized = email.trim().to_lowercase();
        let Some(user) = self.users.find_by_email(&normalized).await? else {
            return Ok(None);
        };

        if user.status != STATUS_ACTIVE {
            return Ok(None);
        }

        let role = self.resolve_role(&user).await?;

        Ok(Some(CredentialRecord {
            id: user.id,
            email: user.email,
            password_hash: user.password_hash,
            role,
        }))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::{CredentialStore, DbCredentialStore, STATUS_INACTIVE};
    use crate::auth::Role;
    use crate::db::dao::{DaoBase, UserDao, UserRoleDao};
    use crate::db::entities::{user, user_role};

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn user_model(id: Uuid, email: &str, status: &str, franchise_id: Uuid) -> user::Model {
        user::Model {
            id,
            created_at: ts(),
            updated_at: ts(),
            email: email.to_string(),
            phone_e164: None,
            password_hash: "hash".to_string(),
            status: status.to_string(),
            franchise_id,
            last_login_at: None,
        }
    }

    fn assignment(user_id: Uuid, franchise_id: Uuid, role: &str) -> user_role::Model {
        user_role::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            updated_at: ts(),
            user_id,
            franchise_id,
            role: role.to_string(),
        }
    }

    fn store_with(db: sea_orm::DatabaseConnection) -> DbCredentialStore {
        DbCredentialStore::new(UserDao::new(&db), UserRoleDao::new(&db))
    }

    #[tokio::test]
    async fn unknown_email_yields_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let found = store_with(db)
            .find_active_by_email("missing@demo.com")
            .await
            .expect("lookup should succeed");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn inactive_user_yields_none() {
        let franchise_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_model(
                Uuid::new_v4(),
                "gone@demo.com",
                STATUS_INACTIVE,
                franchise_id,
            )]])
            .into_connection();

        let found = store_with(db)
            .find_active_by_email("gone@demo.com")
            .await
            .expect("lookup should succeed");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn active_user_resolves_highest_tenant_role() {
        let user_id = Uuid::new_v4();
        let franchise_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_model(
                user_id,
                "admin@demo.com",
                "active",
                franchise_id,
            )]])
            .append_query_results([vec![
                assignment(user_id, franchise_id, "cashier"),
                assignment(user_id, franchise_id, "admin"),
            ]])
            .into_connection();

        let record = store_with(db)
            .find_active_by_email("Admin@Demo.com")
            .await
            .expect("lookup should succeed")
            .expect("user should be found");

        assert_eq!(record.id, user_id);
        assert_eq!(record.role, Role::Admin);
    }

    #[tokio::test]
    async fn user_without_assignments_defaults_to_customer() {
        let user_id = Uuid::new_v4();
        let franchise_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_model(
                user_id,
                "plain@demo.com",
                "active",
                franchise_id,
            )]])
            .append_query_results([Vec::<user_role::Model>::new()])
            .into_connection();

        let record = store_with(db)
            .find_active_by_email("plain@demo.com")
            .await
            .expect("lookup should succeed")
            .expect("user should be found");

        assert_eq!(record.role, Role::Customer);
    }
}
