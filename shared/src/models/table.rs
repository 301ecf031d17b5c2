//! Table Model

use serde::{Deserialize, Serialize};

/// Table entity: a physical seating with capacity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    /// Customer-facing table number
    pub number: i32,
    /// Code printed at the table, grants access to the seating
    pub access_code: String,
    /// Rotates per seating; guests are keyed by it
    pub session_code: String,
    /// Expected diner count; completion threshold for auto-confirmation
    pub covers: i32,
    /// Bill requested. Monotonic: once true, only an external checkout
    /// collaborator clears it.
    pub check_request: bool,
}

/// Create table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCreate {
    pub number: i32,
    pub access_code: String,
    pub session_code: String,
    pub covers: i32,
}

/// Table session status as seen by a connected diner
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    /// Session valid, table active
    Ok,
    /// Session code no longer matches (seating rotated)
    Expired,
    /// The bill has been requested
    Check,
}
