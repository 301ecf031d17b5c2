//! Fidelity Card API Module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// Fidelity router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/fidelity", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/accrue", post(handler::accrue))
        .route("/table-discount/{number}", get(handler::table_discount))
        .route("/use-points", put(handler::use_points))
        .route("/reset", post(handler::reset))
        .route("/{user_id}", get(handler::get_card))
}
