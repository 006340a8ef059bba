use std::sync::Arc;

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::{
    auth::{AnyRole, Role},
    middleware::RoleGuard,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new().route("/me", get(me)).with_state(state)
}

async fn me(guard: RoleGuard<AnyRole>) -> Json<MeResponse> {
    let claims = guard.claims;
    Json(MeResponse {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
    })
}
