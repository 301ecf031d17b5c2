//! Fidelity Card API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::fidelity::AccrualResult;
use crate::utils::{AppError, AppResult};
use shared::models::{FidelityCard, ResetOutcome};

/// POST /api/fidelity/accrue payload
#[derive(Debug, Deserialize)]
pub struct AccruePayload {
    pub user_id: Option<String>,
    #[serde(default)]
    pub product_ids: Vec<String>,
}

/// PUT /api/fidelity/use-points payload
#[derive(Debug, Deserialize)]
pub struct UsePointsPayload {
    pub user_id: Option<String>,
    /// Tri-state: absent resets to unset
    #[serde(default)]
    pub use_points: Option<bool>,
}

/// POST /api/fidelity/reset payload
#[derive(Debug, Deserialize)]
pub struct ResetPayload {
    #[serde(default)]
    pub user_ids: Vec<String>,
}

/// GET /api/fidelity/table-discount/{number} response
#[derive(Debug, Serialize)]
pub struct DiscountResponse {
    pub table_number: i32,
    pub discount: Decimal,
}

fn required(value: Option<String>, what: &str) -> AppResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::validation(format!("Missing {}", what)))
}

/// POST /api/fidelity/accrue - earn points for one purchase
pub async fn accrue(
    State(state): State<ServerState>,
    Json(payload): Json<AccruePayload>,
) -> AppResult<Json<AccrualResult>> {
    let user_id = required(payload.user_id, "user reference")?;
    let result = state.fidelity.accrue(&user_id, &payload.product_ids).await?;
    Ok(Json(result))
}

/// GET /api/fidelity/table-discount/{number} - discount earned by a table
pub async fn table_discount(
    State(state): State<ServerState>,
    Path(number): Path<i32>,
) -> AppResult<Json<DiscountResponse>> {
    let discount = state.fidelity.discount_for_table(number).await?;
    Ok(Json(DiscountResponse {
        table_number: number,
        discount,
    }))
}

/// PUT /api/fidelity/use-points - set the redemption preference
pub async fn use_points(
    State(state): State<ServerState>,
    Json(payload): Json<UsePointsPayload>,
) -> AppResult<Json<FidelityCard>> {
    let user_id = required(payload.user_id, "user reference")?;
    let card = state
        .fidelity
        .toggle_use_points(&user_id, payload.use_points)
        .await?;
    Ok(Json(card))
}

/// POST /api/fidelity/reset - zero points for users with redemption
/// enabled; mixed outcome, not an error
pub async fn reset(
    State(state): State<ServerState>,
    Json(payload): Json<ResetPayload>,
) -> AppResult<Json<ResetOutcome>> {
    if payload.user_ids.is_empty() {
        return Err(AppError::validation("No users to reset"));
    }
    let outcome = state.fidelity.reset_points(&payload.user_ids).await?;
    Ok(Json(outcome))
}

/// GET /api/fidelity/{user_id} - fetch a user's card
pub async fn get_card(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<FidelityCard>> {
    let card = state.fidelity.card_for_user(&user_id).await?;
    Ok(Json(card))
}
