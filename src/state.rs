use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::jwt::JwtKeys;
use crate::config::{AppConfig, AuthConfig};
use crate::services::ServiceContext;

pub struct AppState {
    pub config: AppConfig,
    pub auth_config: AuthConfig,
    pub db: DatabaseConnection,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(config: AppConfig, auth_config: AuthConfig, db: DatabaseConnection) -> Arc<Self> {
        let jwt = JwtKeys::from_secret(auth_config.jwt_secret.as_bytes());
        Arc::new(Self {
            config,
            auth_config,
            db,
            jwt,
        })
    }

    pub fn services(&self) -> ServiceContext {
        ServiceContext::new(&self.db)
    }
}
