//! Table API Module
//!
//! Session-scoped operations for seated diners: access by code, session
//! status, bill request, and the table total at checkout.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Table router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tables", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/access/{access_code}", get(handler::access))
        .route("/status", post(handler::status))
        .route("/check-request", post(handler::check_request))
        .route("/total/{access_code}", get(handler::total))
}
