use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    auth::AdminUp,
    db::dao::PaginatedResponse,
    db::entities::{franchise, store},
    error::AppError,
    middleware::RoleGuard,
    routes::PageQuery,
    services::franchise_service::{FranchisePatch, NewFranchise, NewStore, StorePatch},
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/franchises", post(create_franchise).get(list_franchises))
        .route(
            "/franchises/{franchise_id}",
            get(get_franchise)
                .patch(update_franchise)
                .delete(delete_franchise),
        )
        .route(
            "/franchises/{franchise_id}/stores",
            post(create_store).get(list_stores),
        )
        .route(
            "/stores/{id}",
            get(get_store).patch(update_store).delete(delete_store),
        )
        .with_state(state)
}

async fn create_franchise(
    State(state): State<Arc<AppState>>,
    _guard: RoleGuard<AdminUp>,
    Json(body): Json<NewFranchise>,
) -> Result<(StatusCode, Json<franchise::Model>), AppError> {
    let franchise = state.services().franchises().create(body).await?;
    Ok((StatusCode::CREATED, Json(franchise)))
}

async fn list_franchises(
    State(state): State<Arc<AppState>>,
    _guard: RoleGuard<AdminUp>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<franchise::Model>>, AppError> {
    let franchises = state
        .services()
        .franchises()
        .list(query.page, query.page_size)
        .await?;
    Ok(Json(franchises))
}

async fn get_franchise(
    State(state): State<Arc<AppState>>,
    _guard: RoleGuard<AdminUp>,
    Path(id): Path<Uuid>,
) -> Result<Json<franchise::Model>, AppError> {
    let franchise = state.services().franchises().get(id).await?;
    Ok(Json(franchise))
}

async fn update_franchise(
    State(state): State<Arc<AppState>>,
    _guard: RoleGuard<AdminUp>,
    Path(id): Path<Uuid>,
    Json(body): Json<FranchisePatch>,
) -> Result<Json<franchise::Model>, AppError> {
    let franchise = state.services().franchises().update(id, body).await?;
    Ok(Json(franchise))
}

async fn delete_franchise(
    State(state): State<Arc<AppState>>,
    _guard: RoleGuard<AdminUp>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.services().franchises().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_store(
    State(state): State<Arc<AppState>>,
    _guard: RoleGuard<AdminUp>,
    Path(id): Path<Uuid>,
    Json(body): Json<NewStore>,
) -> Result<(StatusCode, Json<store::Model>), AppError> {
    let store = state.services().franchises().create_store(id, body).await?;
    Ok((StatusCode::CREATED, Json(store)))
}

async fn list_stores(
    State(state): State<Arc<AppState>>,
    _guard: RoleGuard<AdminUp>,
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<store::Model>>, AppError> {
    let stores = state
        .services()
        .franchises()
        .list_stores(id, query.page, query.page_size)
        .await?;
    Ok(Json(stores))
}

async fn get_store(
    State(state): State<Arc<AppState>>,
    _guard: RoleGuard<AdminUp>,
    Path(id): Path<Uuid>,
) -> Result<Json<store::Model>, AppError> {
    let store = state.services().franchises().get_store(id).await?;
    Ok(Json(store))
}

async fn update_store(
    State(state): State<Arc<AppState>>,
    _guard: RoleGuard<AdminUp>,
    Path(id): Path<Uuid>,
    Json(body): Json<StorePatch>,
) -> Result<Json<store::Model>, AppError> {
    let store = state.services().franchises().update_store(id, body).await?;
    Ok(Json(store))
}

async fn delete_store(
    State(state): State<Arc<AppState>>,
    _guard: RoleGuard<AdminUp>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.services().franchises().delete_store(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
