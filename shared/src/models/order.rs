//! Order Model
//!
//! The aggregate per-table order for one seating, plus the single
//! definition of the lifecycle state enum used everywhere.

use serde::{Deserialize, Serialize};

/// Order lifecycle state
///
/// Transitions only move forward along
/// `New < Pending < InProgress < Done < Paid`; `New` cannot be re-entered
/// once left. Done and Paid are terminal for timing purposes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    New,
    Pending,
    InProgress,
    Done,
    Paid,
}

impl OrderState {
    /// Position in the forward-only lifecycle
    pub fn rank(self) -> u8 {
        match self {
            OrderState::New => 0,
            OrderState::Pending => 1,
            OrderState::InProgress => 2,
            OrderState::Done => 3,
            OrderState::Paid => 4,
        }
    }

    /// Whether a transition from `self` to `target` moves strictly forward
    pub fn can_advance_to(self, target: OrderState) -> bool {
        target.rank() > self.rank()
    }
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderState::New => "NEW",
            OrderState::Pending => "PENDING",
            OrderState::InProgress => "IN_PROGRESS",
            OrderState::Done => "DONE",
            OrderState::Paid => "PAID",
        };
        write!(f, "{}", s)
    }
}

/// Order entity: one table's aggregate order for a seating
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Table reference (String ID)
    pub table_id: String,
    pub state: OrderState,
    /// Ordering key for the preparation queue (unix millis).
    /// Re-stamped on confirmation: queue position follows confirmation
    /// order, not the arrival of the first item.
    pub created_at: i64,
    pub all_courses_together: bool,
    /// Kitchen time to produce all items, in minutes. Zero once Done.
    pub preparation_time: i64,
    /// Cumulative queue wait plus own prep time, in minutes. Zero once Done.
    pub time_to_service: i64,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub table_id: String,
    pub state: OrderState,
    pub created_at: i64,
    pub all_courses_together: bool,
}

/// Update order payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderPatch {
    pub state: Option<OrderState>,
    pub created_at: Option<i64>,
    pub all_courses_together: Option<bool>,
    pub preparation_time: Option<i64>,
    pub time_to_service: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_order_is_strict() {
        use OrderState::*;
        let chain = [New, Pending, InProgress, Done, Paid];
        for window in chain.windows(2) {
            assert!(window[0].can_advance_to(window[1]));
            assert!(!window[1].can_advance_to(window[0]));
        }
    }

    #[test]
    fn test_new_cannot_be_reentered() {
        use OrderState::*;
        for state in [Pending, InProgress, Done, Paid] {
            assert!(!state.can_advance_to(New));
        }
    }

    #[test]
    fn test_same_state_is_not_forward() {
        assert!(!OrderState::Pending.can_advance_to(OrderState::Pending));
    }

    #[test]
    fn test_serde_screaming_snake() {
        let json = serde_json::to_string(&OrderState::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
        let back: OrderState = serde_json::from_str("\"DONE\"").unwrap();
        assert_eq!(back, OrderState::Done);
    }
}
