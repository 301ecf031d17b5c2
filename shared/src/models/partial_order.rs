//! Partial Order Model
//!
//! One diner's single product selection within an Order.

use serde::{Deserialize, Serialize};

/// Partial order state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartialOrderState {
    Pending,
    Done,
}

/// Who placed the selection: a registered user or a table-session guest.
/// Exactly one of the two, never both, never neither.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Participant {
    User(String),
    Guest(String),
}

impl Participant {
    /// Registered user id, if this participant is one
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Participant::User(id) => Some(id),
            Participant::Guest(_) => None,
        }
    }
}

/// Partial order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialOrder {
    pub id: String,
    /// Owning order reference (String ID)
    pub order_id: String,
    /// Product reference (String ID)
    pub product_id: String,
    pub participant: Participant,
    pub state: PartialOrderState,
    pub created_at: i64,
}

/// Create partial order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialOrderCreate {
    pub order_id: String,
    pub product_id: String,
    pub participant: Participant,
    pub created_at: i64,
}
