use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    auth::Role,
    db::dao::PaginatedResponse,
    db::entities::customer,
    error::AppError,
    middleware::{RequireRoleLayer, jwt_auth},
    routes::PageQuery,
    services::customer_service::{CustomerPatch, NewCustomer},
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/franchises/{franchise_id}/customers",
            post(create_customer).get(list_customers),
        )
        .route(
            "/customers/{id}",
            get(get_customer)
                .patch(update_customer)
                .delete(delete_customer),
        )
        .route_layer(RequireRoleLayer::new(Role::Manager))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth))
        .with_state(state)
}

async fn create_customer(
    State(state): State<Arc<AppState>>,
    Path(franchise_id): Path<Uuid>,
    Json(body): Json<NewCustomer>,
) -> Result<(StatusCode, Json<customer::Model>), AppError> {
    let created = state
        .services()
        .customers()
        .create(franchise_id, body)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_customers(
    State(state): State<Arc<AppState>>,
    Path(franchise_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<customer::Model>>, AppError> {
    let customers = state
        .services()
        .customers()
        .list(franchise_id, query.page, query.page_size)
        .await?;
    Ok(Json(customers))
}

async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<customer::Model>, AppError> {
    let customer = state.services().customers().get(id).await?;
    Ok(Json(customer))
}

async fn update_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<CustomerPatch>,
) -> Result<Json<customer::Model>, AppError> {
    let customer = state.services().customers().update(id, body).await?;
    Ok(Json(customer))
}

async fn delete_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.services().customers().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
