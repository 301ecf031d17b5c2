//! Shared types for the comanda order core
//!
//! Domain models, the order lifecycle state enum and the unified error
//! taxonomy used by both the core components and the HTTP boundary.

pub mod error;
pub mod models;

pub use error::{ApiResponse, AppError, AppResult, FailureDetail};
pub use models::order::OrderState;
