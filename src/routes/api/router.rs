use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

use super::{auth, catalog, customers, franchises, health, invoices, protected, users};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router(state.clone()))
        .merge(protected::router(state.clone()))
        .merge(users::router(state.clone()))
        .merge(franchises::router(state.clone()))
        .merge(catalog::router(state.clone()))
        .merge(customers::router(state.clone()))
        .merge(invoices::router(state))
}
