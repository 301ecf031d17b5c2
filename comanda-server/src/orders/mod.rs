//! Order Lifecycle & Scheduling Core
//!
//! This module owns the only real invariants in the system:
//! - forward-only lifecycle transitions ([`state_machine`])
//! - capacity-triggered aggregation of diner selections ([`aggregator`])
//! - preparation/service timing and the completion cascade ([`scheduler`])
//! - single-writer-per-key locking that closes the auto-confirm race
//!   ([`locks`])

pub mod aggregator;
pub mod locks;
pub mod scheduler;
pub mod state_machine;

#[cfg(test)]
mod tests;

pub use aggregator::PartialOrderAggregator;
pub use locks::OrderLocks;
pub use scheduler::PreparationTimeScheduler;
pub use state_machine::OrderStateMachine;

use shared::error::FailureDetail;

/// Aggregated result of a bulk update (cascade or bulk close).
///
/// Bulk updates run to completion; partial completion is reported,
/// never swallowed.
#[derive(Debug, Default)]
pub struct BulkOutcome {
    pub updated: usize,
    pub failures: Vec<FailureDetail>,
}

impl BulkOutcome {
    /// Merge another outcome into this one
    pub fn absorb(&mut self, other: BulkOutcome) {
        self.updated += other.updated;
        self.failures.extend(other.failures);
    }
}
