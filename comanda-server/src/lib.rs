//! Comanda Server - order orchestration core for a table-service
//! restaurant platform
//!
//! # Architecture
//!
//! - **Repository Gateway** (`db`): typed record access contract plus the
//!   in-memory backend
//! - **Order core** (`orders`): state machine, partial-order aggregation,
//!   preparation-time scheduling, per-key write locks
//! - **Fidelity** (`fidelity`): loyalty accrual and table discounts
//! - **Catalog** (`catalog`): per-category composition rules
//! - **HTTP API** (`api`): RESTful boundary over the core
//!
//! # Module structure
//!
//! ```text
//! comanda-server/src/
//! ├── core/          # config, state, server
//! ├── db/            # gateway contract + in-memory backend
//! ├── orders/        # lifecycle, aggregation, scheduling
//! ├── fidelity/      # loyalty points and discounts
//! ├── catalog/       # composition rules
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # logging, time helpers
//! ```

pub mod api;
pub mod catalog;
pub mod core;
pub mod db;
pub mod fidelity;
pub mod orders;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use crate::db::{Gateway, MemoryGateway};
pub use crate::fidelity::FidelityDiscountCalculator;
pub use crate::orders::{OrderStateMachine, PartialOrderAggregator, PreparationTimeScheduler};
pub use crate::utils::{AppError, AppResult};

// Re-export logger functions
pub use crate::utils::logger::{init_logger, init_logger_with_file};

/// Load .env and initialize logging from the environment
pub fn setup_environment() {
    dotenv::dotenv().ok();
    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
  _________  ____ ___  ____ _____  ____/ /___ _
 / ___/ __ \/ __ `__ \/ __ `/ __ \/ __  / __ `/
/ /__/ /_/ / / / / / / /_/ / / / / /_/ / /_/ /
\___/\____/_/ /_/ /_/\__,_/_/ /_/\__,_/\__,_/
"#
    );
}
