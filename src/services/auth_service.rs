use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use crate::auth::jwt::{JwtKeys, VerifyError, encode_token, make_access_claims, verify_token};
use crate::auth::password::verify_password;
use crate::auth::store::CredentialStore;
use crate::auth::{Claims, UserIdentity};
use crate::db::dao::UserDao;
use crate::error::AppError;

/// Single message for every login failure so callers cannot probe which
/// emails exist or which accounts are disabled.
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: usize,
    pub user: UserIdentity,
}

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    users: UserDao,
    jwt: JwtKeys,
    access_ttl_secs: usize,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        users: UserDao,
        jwt: JwtKeys,
        access_ttl_secs: usize,
    ) -> Self {
        Self {
            store,
            users,
            jwt,
            access_ttl_secs,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        let record = self.store.find_active_by_email(email).await.map_err(|err| {
            tracing::error!(error = %err, "credential lookup failed");
            AppError::unavailable("database unavailable")
        })?;

        let Some(record) = record else {
            debug!("login rejected: unknown or inactive user");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(password, &record.password_hash)? {
            debug!(user_id = %record.id, "login rejected: password mismatch");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let claims = make_access_claims(&record.id, &record.email, record.role, self.access_ttl_secs);
        let access_token = encode_token(&self.jwt, &claims)?;

        let now = Utc::now().fixed_offset();
        self.users
            .set_last_login(&record.id, &now)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, user_id = %record.id, "last-login stamp failed");
                AppError::unavailable("database unavailable")
            })?;

        info!(user_id = %record.id, role = %record.role, "login succeeded");
        Ok(LoginResponse {
            access_token,
            token_type: "Bearer",
            expires_in: self.access_ttl_secs,
            user: UserIdentity {
                id: record.id,
                email: record.email,
                role: record.role,
            },
        })
    }

    /// Check a token without touching the database. Expired and malformed
    /// tokens both come back as 401; the distinction lives in the logs.
    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        match verify_token(&self.jwt, token) {
            Ok(claims) => Ok(claims),
            Err(VerifyError::Expired) => {
                debug!("token rejected: expired");
                Err(AppError::unauthorized("token expired"))
            }
            Err(VerifyError::Invalid(err)) => {
                debug!(error = %err, "token rejected: invalid");
                Err(AppError::unauthorized("invalid token"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::http::StatusCode;
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::{AuthService, INVALID_CREDENTIALS};
    use crate::auth::Role;
    use crate::auth::jwt::{JwtKeys, verify_token};
    use crate::auth::password::hash_password;
    use crate::auth::store::{CredentialRecord, CredentialStore, StoreError};
    use crate::db::dao::{DaoBase, UserDao};
    use crate::db::entities::user;

    struct FakeStore(Option<CredentialRecord>);

    #[async_trait]
    impl CredentialStore for FakeStore {
        async fn find_active_by_email(
            &self,
            _email: &str,
        ) -> Result<Option<CredentialRecord>, StoreError> {
            Ok(self.0.clone())
        }
    }

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn user_model(id: Uuid) -> user::Model {
        user::Model {
            id,
            created_at: ts(),
            updated_at: ts(),
            email: "cashier@demo.com".to_string(),
            phone_e164: None,
            password_hash: "hash".to_string(),
            status: "active".to_string(),
            franchise_id: Uuid::new_v4(),
            last_login_at: None,
        }
    }

    fn service(record: Option<CredentialRecord>, db: sea_orm::DatabaseConnection) -> AuthService {
        AuthService::new(
            Arc::new(FakeStore(record)),
            UserDao::new(&db),
            JwtKeys::from_secret(b"unit-test-secret"),
            3600,
        )
    }

    #[tokio::test]
    async fn unknown_user_gets_generic_unauthorized() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = service(None, db)
            .login("nobody@demo.com", "password123")
            .await
            .expect_err("login should fail");

        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn wrong_password_gets_same_message_as_unknown_user() {
        let record = CredentialRecord {
            id: Uuid::new_v4(),
            email: "cashier@demo.com".to_string(),
            password_hash: hash_password("password123").expect("hash should succeed"),
            role: Role::Cashier,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = service(Some(record), db)
            .login("cashier@demo.com", "password124")
            .await
            .expect_err("login should fail");

        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn successful_login_issues_token_for_the_user() {
        let user_id = Uuid::new_v4();
        let record = CredentialRecord {
            id: user_id,
            email: "cashier@demo.com".to_string(),
            password_hash: hash_password("password123").expect("hash should succeed"),
            role: Role::Cashier,
        };
        // set_last_login: one lookup, one returning update.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_model(user_id)]])
            .append_query_results([vec![user_model(user_id)]])
            .into_connection();

        let response = service(Some(record), db)
            .login("cashier@demo.com", "password123")
            .await
            .expect("login should succeed");

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 3600);
        assert_eq!(response.user.id, user_id);
        assert_eq!(response.user.role, Role::Cashier);

        let keys = JwtKeys::from_secret(b"unit-test-secret");
        let claims = verify_token(&keys, &response.access_token).expect("token should verify");
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, Role::Cashier);
    }

    #[tokio::test]
    async fn validate_rejects_garbage_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = service(None, db)
            .validate("not-a-jwt")
            .expect_err("garbage should fail");

        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }
}
