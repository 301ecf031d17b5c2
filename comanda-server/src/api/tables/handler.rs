//! Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::{OrderStore, PartialOrderStore, ProductStore, TableStore};
use crate::utils::{AppError, AppResult};
use shared::models::{Table, TableStatus};

/// POST /api/tables/status and /api/tables/check-request payload
#[derive(Debug, Deserialize)]
pub struct SessionPayload {
    pub access_code: Option<String>,
    pub session_code: Option<String>,
}

/// GET /api/tables/access/{access_code} response
#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub number: i32,
    pub session_code: String,
}

/// GET /api/tables/total/{access_code} response
#[derive(Debug, Serialize)]
pub struct TotalResponse {
    pub total: Decimal,
    pub discount: Decimal,
}

fn required(value: Option<String>, what: &str) -> AppResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::validation(format!("Missing {}", what)))
}

/// Matching table with a live session, by access + session code
async fn verify_session(
    state: &ServerState,
    access_code: &str,
    session_code: &str,
) -> AppResult<Table> {
    let table = state
        .gateway
        .table_by_access_code(access_code)
        .await?
        .filter(|t| t.session_code == session_code && !t.check_request)
        .ok_or_else(|| AppError::not_found("Table"))?;
    Ok(table)
}

/// GET /api/tables/access/{access_code} - join a seating by its printed
/// code
pub async fn access(
    State(state): State<ServerState>,
    Path(access_code): Path<String>,
) -> AppResult<Json<AccessResponse>> {
    let table = state
        .gateway
        .table_by_access_code(&access_code)
        .await?
        .ok_or_else(|| AppError::not_found("Table"))?;
    if table.check_request {
        return Err(AppError::conflict("The bill has already been requested"));
    }
    Ok(Json(AccessResponse {
        number: table.number,
        session_code: table.session_code,
    }))
}

/// POST /api/tables/status - session status as seen by a diner
pub async fn status(
    State(state): State<ServerState>,
    Json(payload): Json<SessionPayload>,
) -> AppResult<Json<TableStatus>> {
    let access_code = required(payload.access_code, "access code")?;
    let session_code = required(payload.session_code, "session code")?;

    let table = state
        .gateway
        .table_by_access_code(&access_code)
        .await?
        .ok_or_else(|| AppError::not_found("Table"))?;

    let status = if table.session_code != session_code {
        TableStatus::Expired
    } else if table.check_request {
        TableStatus::Check
    } else {
        TableStatus::Ok
    };
    Ok(Json(status))
}

/// POST /api/tables/check-request - request the bill. Requires at least
/// one order not yet paid; the flag is monotonic.
pub async fn check_request(
    State(state): State<ServerState>,
    Json(payload): Json<SessionPayload>,
) -> AppResult<Json<Table>> {
    let access_code = required(payload.access_code, "access code")?;
    let session_code = required(payload.session_code, "session code")?;

    let table = verify_session(&state, &access_code, &session_code).await?;
    let unpaid = state.gateway.count_unpaid_for_table(&table.id).await?;
    if unpaid == 0 {
        return Err(AppError::validation("No orders for this table"));
    }

    let updated = state.gateway.set_check_request(&table.id).await?;
    tracing::info!(table_id = %updated.id, "Check requested");
    Ok(Json(updated))
}

/// GET /api/tables/total/{access_code} - everything the table ordered,
/// plus the fidelity discount its participants earned
pub async fn total(
    State(state): State<ServerState>,
    Path(access_code): Path<String>,
) -> AppResult<Json<TotalResponse>> {
    let table = state
        .gateway
        .table_by_access_code(&access_code)
        .await?
        .ok_or_else(|| AppError::not_found("Table"))?;

    let orders = state.gateway.orders_for_table(&table.id, None).await?;
    let mut product_ids: Vec<String> = Vec::new();
    for order in &orders {
        let partials = state.gateway.partial_orders_for_order(&order.id).await?;
        product_ids.extend(partials.into_iter().map(|p| p.product_id));
    }

    // One entry per selection: duplicates are intentional
    let products = state.gateway.products_by_ids(&product_ids).await?;
    if products.len() != product_ids.len() {
        return Err(AppError::internal("Order references a missing product"));
    }
    let total: Decimal = products.iter().map(|p| p.price).sum();

    let discount = state.fidelity.discount_for_table(table.number).await?;
    Ok(Json(TotalResponse { total, discount }))
}
