//! Guest Model
//!
//! Anonymous diner attached to a table session. Created lazily the first
//! time a diner without a registered account orders at the table.

use serde::{Deserialize, Serialize};

/// Guest entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
    pub id: String,
    /// The owning table's session code
    pub session_code: String,
    pub created_at: i64,
}

/// Create guest payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestCreate {
    pub session_code: String,
    pub created_at: i64,
}
