//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`orders`] - order lifecycle (confirm, set status, queries)
//! - [`partial_orders`] - per-diner selections
//! - [`fidelity`] - loyalty points and discounts
//! - [`products`] - diner-composed products
//! - [`tables`] - table session operations

pub mod fidelity;
pub mod health;
pub mod orders;
pub mod partial_orders;
pub mod products;
pub mod tables;

// Re-export common types for handlers
pub use shared::{ApiResponse, AppError, AppResult};
