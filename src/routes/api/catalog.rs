use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::Role,
    db::dao::PaginatedResponse,
    db::entities::{category, item},
    error::AppError,
    middleware::{RequireRoleLayer, jwt_auth},
    routes::PageQuery,
    services::catalog_service::{ItemPatch, NewItem},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct NewCategoryRequest {
    pub name: String,
}

// Query-string deserialization cannot flatten numeric fields, so paging is
// spelled out here instead of embedding PageQuery.
#[derive(Debug, Deserialize)]
pub struct ItemListQuery {
    pub category_id: Option<Uuid>,
    #[serde(default = "crate::routes::default_page")]
    pub page: u64,
    #[serde(default = "crate::routes::default_page_size")]
    pub page_size: u64,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/franchises/{franchise_id}/categories",
            post(create_category).get(list_categories),
        )
        .route(
            "/categories/{id}",
            delete(delete_category).patch(rename_category),
        )
        .route(
            "/franchises/{franchise_id}/items",
            post(create_item).get(list_items),
        )
        .route(
            "/items/{id}",
            get(get_item).patch(update_item).delete(delete_item),
        )
        .route_layer(RequireRoleLayer::new(Role::Manager))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth))
        .with_state(state)
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    Path(franchise_id): Path<Uuid>,
    Json(body): Json<NewCategoryRequest>,
) -> Result<(StatusCode, Json<category::Model>), AppError> {
    let created = state
        .services()
        .catalog()
        .create_category(franchise_id, &body.name)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_categories(
    State(state): State<Arc<AppState>>,
    Path(franchise_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<category::Model>>, AppError> {
    let categories = state
        .services()
        .catalog()
        .list_categories(franchise_id, query.page, query.page_size)
        .await?;
    Ok(Json(categories))
}

async fn rename_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<NewCategoryRequest>,
) -> Result<Json<category::Model>, AppError> {
    let renamed = state
        .services()
        .catalog()
        .rename_category(id, &body.name)
        .await?;
    Ok(Json(renamed))
}

async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.services().catalog().delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_item(
    State(state): State<Arc<AppState>>,
    Path(franchise_id): Path<Uuid>,
    Json(body): Json<NewItem>,
) -> Result<(StatusCode, Json<item::Model>), AppError> {
    let created = state
        .services()
        .catalog()
        .create_item(franchise_id, body)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_items(
    State(state): State<Arc<AppState>>,
    Path(franchise_id): Path<Uuid>,
    Query(query): Query<ItemListQuery>,
) -> Result<Json<PaginatedResponse<item::Model>>, AppError> {
    let items = state
        .services()
        .catalog()
        .list_items(franchise_id, query.category_id, query.page, query.page_size)
        .await?;
    Ok(Json(items))
}

async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<item::Model>, AppError> {
    let item = state.services().catalog().get_item(id).await?;
    Ok(Json(item))
}

async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<ItemPatch>,
) -> Result<Json<item::Model>, AppError> {
    let item = state.services().catalog().update_item(id, body).await?;
    Ok(Json(item))
}

async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.services().catalog().delete_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
