use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::Role;
use crate::auth::password::hash_password;
use crate::auth::store::{STATUS_ACTIVE, STATUS_INACTIVE};
use crate::db::dao::{DaoBase, FranchiseDao, PaginatedResponse, UserDao, UserRoleDao};
use crate::db::entities::{user, user_role};
use crate::error::AppError;

/// User shape returned over the wire. The password hash never leaves the
/// service layer.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub phone_e164: Option<String>,
    pub status: String,
    pub franchise_id: Uuid,
    pub last_login_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

impl From<user::Model> for UserView {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            phone_e164: model.phone_e164,
            status: model.status,
            franchise_id: model.franchise_id,
            last_login_at: model.last_login_at,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub phone_e164: Option<String>,
    pub franchise_id: Uuid,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UserPatch {
    pub phone_e164: Option<String>,
    pub status: Option<String>,
}

pub struct UserService {
    users: UserDao,
    user_roles: UserRoleDao,
    franchises: FranchiseDao,
}

impl UserService {
    pub fn new(users: UserDao, user_roles: UserRoleDao, franchises: FranchiseDao) -> Self {
        Self {
            users,
            user_roles,
            franchises,
        }
    }

    pub async fn create(&self, req: NewUser) -> Result<UserView, AppError> {
        let email = normalize_email(&req.email)?;
        let role = req
            .role
            .as_deref()
            .map(parse_role)
            .transpose()?;

        // Home franchise must exist before we touch the users table.
        self.franchises.find_by_id(req.franchise_id).await?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("email already registered"));
        }

        let password_hash = hash_password(&req.password)?;
        let created = self
            .users
            .create_user(
                &email,
                req.phone_e164.as_deref(),
                &password_hash,
                STATUS_ACTIVE,
                &req.franchise_id,
            )
            .await?;

        if let Some(role) = role {
            self.user_roles
                .assign(&created.id, &req.franchise_id, role.as_str())
                .await?;
        }

        info!(user_id = %created.id, "created user");
        Ok(created.into())
    }

    pub async fn get(&self, id: Uuid) -> Result<UserView, AppError> {
        Ok(self.users.find_by_id(id).await?.into())
    }

    pub async fn list(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<UserView>, AppError> {
        let response = self.users.find(page, page_size, None, |query| query).await?;
        Ok(PaginatedResponse {
            data: response.data.into_iter().map(UserView::from).collect(),
            page: response.page,
            page_size: response.page_size,
            has_next: response.has_next,
        })
    }

    pub async fn update(&self, id: Uuid, patch: UserPatch) -> Result<UserView, AppError> {
        if let Some(status) = patch.status.as_deref() {
            if status != STATUS_ACTIVE && status != STATUS_INACTIVE {
                return Err(AppError::bad_request("unknown user status"));
            }
        }

        let updated = self
            .users
            .update(id, move |active| {
                if let Some(phone) = patch.phone_e164 {
                    active.phone_e164 = sea_orm::Set(Some(phone));
                }
                if let Some(status) = patch.status {
                    active.status = sea_orm::Set(status);
                }
            })
            .await?;
        Ok(updated.into())
    }

    /// Deletion is a soft deactivate so invoices and role assignments keep a
    /// valid user to point at.
    pub async fn deactivate(&self, id: Uuid) -> Result<UserView, AppError> {
        let updated = self.users.set_status(&id, STATUS_INACTIVE).await?;
        info!(user_id = %id, "deactivated user");
        Ok(updated.into())
    }

    pub async fn assign_role(
        &self,
        user_id: Uuid,
        franchise_id: Uuid,
        role: &str,
    ) -> Result<user_role::Model, AppError> {
        let role = parse_role(role)?;
        self.users.find_by_id(user_id).await?;
        self.franchises.find_by_id(franchise_id).await?;

        let existing = self
            .user_roles
            .find_assignment(&user_id, &franchise_id, role.as_str())
            .await?;
        if existing.is_some() {
            return Err(AppError::conflict("role already assigned"));
        }

        let assignment = self
            .user_roles
            .assign(&user_id, &franchise_id, role.as_str())
            .await?;
        info!(user_id = %user_id, franchise_id = %franchise_id, role = %role, "assigned role");
        Ok(assignment)
    }

    pub async fn roles(&self, user_id: Uuid) -> Result<Vec<user_role::Model>, AppError> {
        self.users.find_by_id(user_id).await?;
        Ok(self.user_roles.roles_for_user(&user_id).await?)
    }

    pub async fn remove_role(&self, assignment_id: Uuid) -> Result<Uuid, AppError> {
        Ok(self.user_roles.delete(assignment_id).await?)
    }
}

fn parse_role(raw: &str) -> Result<Role, AppError> {
    Role::try_from(raw).map_err(|_| AppError::bad_request("unknown role"))
}

fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(AppError::bad_request("invalid email address"));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::{NewUser, UserService, normalize_email};
    use crate::db::dao::DaoBase;
    use crate::db::entities::{franchise, user};

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn franchise_model(id: Uuid) -> franchise::Model {
        franchise::Model {
            id,
            created_at: ts(),
            updated_at: ts(),
            name: "Demo Water Solutions".to_string(),
            reg_number: "REG-2020-001".to_string(),
            vat_registered: true,
            vat_number: Some("VAT-4820103948".to_string()),
            address: "1 Main Road, Cape Town".to_string(),
        }
    }

    fn user_model(id: Uuid, email: &str, franchise_id: Uuid) -> user::Model {
        user::Model {
            id,
            created_at: ts(),
            updated_at: ts(),
            email: email.to_string(),
            phone_e164: None,
            password_hash: "hash".to_string(),
            status: "active".to_string(),
            franchise_id,
            last_login_at: None,
        }
    }

    fn service(db: &sea_orm::DatabaseConnection) -> UserService {
        UserService::new(DaoBase::new(db), DaoBase::new(db), DaoBase::new(db))
    }

    #[test]
    fn normalize_email_lowercases_and_trims() {
        assert_eq!(
            normalize_email("  Alice@Demo.COM ").expect("email should be valid"),
            "alice@demo.com"
        );
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("@demo.com").is_err());
        assert!(normalize_email("alice@nodot").is_err());
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email_with_conflict() {
        let franchise_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![franchise_model(franchise_id)]])
            .append_query_results([vec![user_model(
                Uuid::new_v4(),
                "alice@demo.com",
                franchise_id,
            )]])
            .into_connection();

        let err = service(&db)
            .create(NewUser {
                email: "Alice@Demo.com".to_string(),
                password: "password123".to_string(),
                phone_e164: None,
                franchise_id,
                role: None,
            })
            .await
            .expect_err("duplicate email should fail");

        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn create_rejects_unknown_role_before_touching_db() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = service(&db)
            .create(NewUser {
                email: "alice@demo.com".to_string(),
                password: "password123".to_string(),
                phone_e164: None,
                franchise_id: Uuid::new_v4(),
                role: Some("root".to_string()),
            })
            .await
            .expect_err("unknown role should fail");

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn deactivate_marks_user_inactive() {
        let user_id = Uuid::new_v4();
        let franchise_id = Uuid::new_v4();
        let mut inactive = user_model(user_id, "alice@demo.com", franchise_id);
        inactive.status = "inactive".to_string();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_model(user_id, "alice@demo.com", franchise_id)]])
            .append_query_results([vec![inactive]])
            .into_connection();

        let view = service(&db)
            .deactivate(user_id)
            .await
            .expect("deactivate should succeed");
        assert_eq!(view.status, "inactive");
    }
}
