//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::{OrderStore, PartialOrderStore};
use crate::utils::{AppError, AppResult};
use shared::models::{Order, OrderState, PartialOrder};

/// POST /api/orders/confirm payload
#[derive(Debug, Deserialize)]
pub struct ConfirmPayload {
    pub order_id: Option<String>,
    #[serde(default)]
    pub all_courses_together: Option<bool>,
}

/// POST /api/orders/set_status payload
#[derive(Debug, Deserialize)]
pub struct SetStatusPayload {
    pub order_id: Option<String>,
    pub new_state: Option<OrderState>,
}

/// GET /api/orders/table/{table_id} query
#[derive(Debug, Deserialize)]
pub struct SinceQuery {
    pub since: Option<i64>,
}

/// An order together with its selections
#[derive(Debug, Serialize)]
pub struct OrderWithPartials {
    #[serde(flatten)]
    pub order: Order,
    pub partial_orders: Vec<PartialOrder>,
}

/// POST /api/orders/confirm - submit a New order to the kitchen
pub async fn confirm(
    State(state): State<ServerState>,
    Json(payload): Json<ConfirmPayload>,
) -> AppResult<Json<Order>> {
    let order_id = payload
        .order_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::validation("Missing order reference"))?;
    let order = state
        .state_machine
        .confirm(&order_id, payload.all_courses_together.unwrap_or(false))
        .await?;
    Ok(Json(order))
}

/// POST /api/orders/set_status - move an order along its lifecycle
pub async fn set_status(
    State(state): State<ServerState>,
    Json(payload): Json<SetStatusPayload>,
) -> AppResult<Json<Order>> {
    let order_id = payload
        .order_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::validation("Missing order reference"))?;
    let new_state = payload
        .new_state
        .ok_or_else(|| AppError::validation("Missing target state"))?;
    let order = state.state_machine.set_status(&order_id, new_state).await?;
    Ok(Json(order))
}

/// GET /api/orders/current/{table_id} - the table's open order with its
/// selections, or null
pub async fn current_for_table(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
) -> AppResult<Json<Option<OrderWithPartials>>> {
    let Some(order) = state.gateway.open_order_for_table(&table_id).await? else {
        return Ok(Json(None));
    };
    let partial_orders = state.gateway.partial_orders_for_order(&order.id).await?;
    Ok(Json(Some(OrderWithPartials {
        order,
        partial_orders,
    })))
}

/// GET /api/orders/table/{table_id}?since= - the table's orders; 304
/// when nothing changed after `since`
pub async fn for_table(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
    Query(query): Query<SinceQuery>,
) -> AppResult<Response> {
    let orders = state
        .gateway
        .orders_for_table(&table_id, query.since)
        .await?;
    if query.since.is_some() && orders.is_empty() {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }
    Ok(Json(orders).into_response())
}
