use std::sync::Arc;

use axum::Router;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

use crate::config::{AppConfig, AuthConfig};
use crate::routes::router;
use crate::state::AppState;

pub fn test_auth_config(jwt_secret: &str) -> AuthConfig {
    AuthConfig {
        jwt_secret: jwt_secret.to_string(),
        access_ttl_secs: 3600,
        admin_email: "admin@demo.com".to_string(),
        admin_password: "password123".to_string(),
    }
}

pub fn test_state(db: DatabaseConnection, jwt_secret: &str) -> Arc<AppState> {
    AppState::new(AppConfig::default(), test_auth_config(jwt_secret), db)
}

/// Router over an empty mock connection; enough for routes that reject
/// before touching the database.
pub fn test_router(jwt_secret: &str) -> Router {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    test_router_with_db(db, jwt_secret)
}

pub fn test_router_with_db(db: DatabaseConnection, jwt_secret: &str) -> Router {
    router(test_state(db, jwt_secret))
}
