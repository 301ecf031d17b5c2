//! Partial Order API Handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};
use shared::models::PartialOrder;

/// POST /api/partial-orders payload
#[derive(Debug, Deserialize)]
pub struct CreatePayload {
    pub product_id: Option<String>,
    pub table_id: Option<String>,
    /// Registered user reference; guests are resolved server-side
    pub user_id: Option<String>,
}

/// DELETE /api/partial-orders payload
#[derive(Debug, Deserialize)]
pub struct RemovePayload {
    pub order_id: Option<String>,
    pub product_id: Option<String>,
}

fn required(value: Option<String>, what: &str) -> AppResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::validation(format!("Missing {}", what)))
}

/// POST /api/partial-orders - register one diner's selection
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreatePayload>,
) -> AppResult<(StatusCode, Json<PartialOrder>)> {
    let product_id = required(payload.product_id, "product reference")?;
    let table_id = required(payload.table_id, "table reference")?;

    let partial = state
        .aggregator
        .add_partial_order(&product_id, &table_id, payload.user_id.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(partial)))
}

/// DELETE /api/partial-orders - remove one selection from an editable
/// order
pub async fn remove(
    State(state): State<ServerState>,
    Json(payload): Json<RemovePayload>,
) -> AppResult<Json<bool>> {
    let order_id = required(payload.order_id, "order reference")?;
    let product_id = required(payload.product_id, "product reference")?;

    let removed = state
        .aggregator
        .remove_product_from_order(&order_id, &product_id)
        .await?;
    Ok(Json(removed))
}
