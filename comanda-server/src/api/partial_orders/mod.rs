//! Partial Order API Module

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Partial order router
pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/partial-orders",
        post(handler::create).delete(handler::remove),
    )
}
