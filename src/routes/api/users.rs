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
    db::entities::user_role,
    error::AppError,
    middleware::{RequireRoleLayer, jwt_auth},
    routes::PageQuery,
    services::user_service::{NewUser, UserPatch, UserView},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub franchise_id: Uuid,
    pub role: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route(
            "/users/{id}",
            get(get_user).patch(update_user).delete(deactivate_user),
        )
        .route("/users/{id}/roles", post(assign_role).get(list_roles))
        .route("/users/{id}/roles/{assignment_id}", delete(remove_role))
        .route_layer(RequireRoleLayer::new(Role::Admin))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth))
        .with_state(state)
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewUser>,
) -> Result<(StatusCode, Json<UserView>), AppError> {
    let user = state.services().users().create(body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<UserView>>, AppError> {
    let users = state
        .services()
        .users()
        .list(query.page, query.page_size)
        .await?;
    Ok(Json(users))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserView>, AppError> {
    let user = state.services().users().get(id).await?;
    Ok(Json(user))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<UserPatch>,
) -> Result<Json<UserView>, AppError> {
    let user = state.services().users().update(id, body).await?;
    Ok(Json(user))
}

async fn deactivate_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserView>, AppError> {
    let user = state.services().users().deactivate(id).await?;
    Ok(Json(user))
}

async fn assign_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<AssignRoleRequest>,
) -> Result<(StatusCode, Json<user_role::Model>), AppError> {
    let assignment = state
        .services()
        .users()
        .assign_role(id, body.franchise_id, &body.role)
        .await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

async fn list_roles(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<user_role::Model>>, AppError> {
    let roles = state.services().users().roles(id).await?;
    Ok(Json(roles))
}

async fn remove_role(
    State(state): State<Arc<AppState>>,
    Path((_id, assignment_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    state.services().users().remove_role(assignment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
