//! Product API Handlers

use axum::{Json, extract::State, http::StatusCode};

use crate::catalog::ComposeDraft;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};
use shared::models::Product;

/// POST /api/products/compose - validate, price and create a
/// diner-composed product
pub async fn compose(
    State(state): State<ServerState>,
    Json(draft): Json<ComposeDraft>,
) -> AppResult<(StatusCode, Json<Product>)> {
    if draft.category_id.trim().is_empty() {
        return Err(AppError::validation("Missing category reference"));
    }
    let product = state
        .preprocessor
        .compose_product(state.gateway.as_ref(), draft)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}
