//! Utility module: logging setup and small helpers

pub mod logger;
pub mod time;

pub use logger::{init_logger, init_logger_with_file};
pub use time::now_millis;

// Re-export error types from shared for handler convenience
pub use shared::{ApiResponse, AppError, AppResult};
