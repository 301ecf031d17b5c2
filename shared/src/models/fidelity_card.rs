//! Fidelity Card Model
//!
//! Loyalty state per registered user. Points only decrease via an
//! explicit reset, and only while `use_points` is enabled.

use serde::{Deserialize, Serialize};

/// Fidelity card entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FidelityCard {
    pub id: String,
    /// Registered user reference (String ID)
    pub user_id: String,
    /// Accrued loyalty points, non-negative
    pub points: i64,
    /// Tri-state redemption preference: unset / declined / enabled
    pub use_points: Option<bool>,
}

/// Create fidelity card payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FidelityCardCreate {
    pub user_id: String,
    pub points: i64,
    pub use_points: Option<bool>,
}

/// Update fidelity card payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FidelityCardPatch {
    pub points: Option<i64>,
    /// `Some(value)` overwrites the tri-state flag with `value`
    pub use_points: Option<Option<bool>>,
}

/// Outcome of a bulk points reset: partial success is expected and
/// reported, not escalated to a hard failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetOutcome {
    /// User IDs whose points were zeroed
    pub success: Vec<String>,
    /// Per-user failure reasons (card not found / use-points not enabled)
    pub failed: Vec<crate::error::FailureDetail>,
}
