//! Product API Module
//!
//! The catalog itself is managed by an external collaborator; the only
//! write exposed here is diner-side composition.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Product router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/compose", post(handler::compose))
}
