//! Order API Module
//!
//! Lifecycle mutations go through the state machine; reads are served
//! straight from the gateway.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // Lifecycle
        .route("/confirm", post(handler::confirm))
        .route("/set_status", post(handler::set_status))
        // Queries
        .route("/current/{table_id}", get(handler::current_for_table))
        .route("/table/{table_id}", get(handler::for_table))
}
