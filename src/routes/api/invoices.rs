use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::Role,
    db::dao::PaginatedResponse,
    db::entities::invoice,
    error::AppError,
    middleware::{RequireRoleLayer, jwt_auth},
    services::invoice_service::{
        InvoiceDetail, InvoiceDraft, InvoiceStatus, PaymentMethod, PaymentOutcome,
    },
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct InvoiceListQuery {
    pub status: Option<String>,
    #[serde(default = "crate::routes::default_page")]
    pub page: u64,
    #[serde(default = "crate::routes::default_page_size")]
    pub page_size: u64,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub reference: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/franchises/{franchise_id}/invoices",
            post(create_invoice).get(list_invoices),
        )
        .route("/invoices/{id}", get(get_invoice))
        .route("/invoices/{id}/issue", post(issue_invoice))
        .route("/invoices/{id}/void", post(void_invoice))
        .route("/invoices/{id}/payments", post(record_payment))
        .route_layer(RequireRoleLayer::new(Role::Manager))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth))
        .with_state(state)
}

fn invoice_service(state: &AppState) -> crate::services::invoice_service::InvoiceService {
    state.services().invoices(&state.config.invoicing)
}

async fn create_invoice(
    State(state): State<Arc<AppState>>,
    Path(franchise_id): Path<Uuid>,
    Json(body): Json<InvoiceDraft>,
) -> Result<(StatusCode, Json<InvoiceDetail>), AppError> {
    let detail = invoice_service(&state).create(franchise_id, body).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

async fn list_invoices(
    State(state): State<Arc<AppState>>,
    Path(franchise_id): Path<Uuid>,
    Query(query): Query<InvoiceListQuery>,
) -> Result<Json<PaginatedResponse<invoice::Model>>, AppError> {
    let status = query
        .status
        .as_deref()
        .map(|raw| {
            InvoiceStatus::try_from(raw)
                .map_err(|_| AppError::bad_request("unknown invoice status"))
        })
        .transpose()?;

    let invoices = invoice_service(&state)
        .list(franchise_id, status, query.page, query.page_size)
        .await?;
    Ok(Json(invoices))
}

async fn get_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceDetail>, AppError> {
    let detail = invoice_service(&state).get_detail(id).await?;
    Ok(Json(detail))
}

async fn issue_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<invoice::Model>, AppError> {
    let issued = invoice_service(&state).issue(id).await?;
    Ok(Json(issued))
}

async fn void_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<invoice::Model>, AppError> {
    let voided = invoice_service(&state).void(id).await?;
    Ok(Json(voided))
}

async fn record_payment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<PaymentRequest>,
) -> Result<(StatusCode, Json<PaymentOutcome>), AppError> {
    let outcome = invoice_service(&state)
        .record_payment(id, body.amount_cents, body.method, body.reference.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}
