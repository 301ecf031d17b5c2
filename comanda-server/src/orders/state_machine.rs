//! Order state machine
//!
//! Owns the lifecycle of an order: validates transitions, computes timing
//! on confirmation, and on completion cascades timing adjustments to
//! later orders and closes the order's partial orders.
//!
//! Transitions only move forward along
//! `New → Pending → InProgress → Done → Paid`; setting the current state
//! again is a no-op so retries are safe.

use shared::models::{Order, OrderPatch, OrderState};
use shared::{AppError, AppResult};
use std::sync::Arc;
use tracing::info;

use super::{BulkOutcome, OrderLocks, PreparationTimeScheduler, aggregator};
use crate::db::{Gateway, OrderStore};
use crate::utils::now_millis;

/// Validates and executes order lifecycle transitions
pub struct OrderStateMachine {
    gateway: Arc<dyn Gateway>,
    scheduler: Arc<PreparationTimeScheduler>,
    locks: Arc<OrderLocks>,
}

impl OrderStateMachine {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        scheduler: Arc<PreparationTimeScheduler>,
        locks: Arc<OrderLocks>,
    ) -> Self {
        Self {
            gateway,
            scheduler,
            locks,
        }
    }

    /// Confirm a New order: compute its preparation time, seed its queue
    /// wait from the order confirmed right before it, and move it to
    /// Pending.
    ///
    /// The ordering key is re-stamped here on purpose: queue position is
    /// decided by confirmation order, not by when the first item arrived.
    pub async fn confirm(&self, order_id: &str, all_courses_together: bool) -> AppResult<Order> {
        let _guard = self.locks.acquire_order(order_id).await;

        let order = self
            .gateway
            .order_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {}", order_id)))?;
        if order.state != OrderState::New {
            return Err(AppError::conflict(format!(
                "Order {} already confirmed (state {})",
                order_id, order.state
            )));
        }

        let preparation_time = self.scheduler.calculate_prep_time(order_id).await?;
        let now = now_millis();
        let queue_wait = self
            .scheduler
            .order_before(now)
            .await?
            .map(|prev| prev.time_to_service)
            .unwrap_or(0);

        let updated = self
            .gateway
            .update_order(
                order_id,
                OrderPatch {
                    state: Some(OrderState::Pending),
                    created_at: Some(now),
                    all_courses_together: Some(all_courses_together),
                    preparation_time: Some(preparation_time),
                    time_to_service: Some(preparation_time + queue_wait),
                },
            )
            .await?;

        info!(
            order_id = %order_id,
            prep_min = preparation_time,
            service_min = updated.time_to_service,
            "Order confirmed"
        );
        Ok(updated)
    }

    /// Move an order to `new_state`.
    ///
    /// Rejects `New` (no way back), returns the unchanged order when the
    /// state already matches, and refuses backward jumps. Reaching `Done`
    /// settles the order: later queued orders stop waiting on it, its own
    /// timings drop to zero and its partial orders are closed.
    pub async fn set_status(&self, order_id: &str, new_state: OrderState) -> AppResult<Order> {
        if new_state == OrderState::New {
            return Err(AppError::validation("An order cannot revert to NEW"));
        }

        let _guard = self.locks.acquire_order(order_id).await;

        let order = self
            .gateway
            .order_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {}", order_id)))?;
        if order.state == new_state {
            // Idempotent retry
            return Ok(order);
        }
        if !order.state.can_advance_to(new_state) {
            return Err(AppError::conflict(format!(
                "Order {} cannot move from {} to {}",
                order_id, order.state, new_state
            )));
        }

        if new_state == OrderState::Done {
            return self.settle(order).await;
        }

        let updated = self
            .gateway
            .update_order(
                order_id,
                OrderPatch {
                    state: Some(new_state),
                    ..Default::default()
                },
            )
            .await?;
        info!(order_id = %order_id, state = %new_state, "Order state updated");
        Ok(updated)
    }

    /// Completion path: the order leaves the preparation queue.
    ///
    /// The cascade, the order's own update and the bulk close all run to
    /// completion; their failures are aggregated and surfaced as one
    /// `PartialFailure` instead of silently dropping records.
    async fn settle(&self, order: Order) -> AppResult<Order> {
        let mut outcome = self
            .scheduler
            .edit_orders_after(order.created_at, -order.preparation_time)
            .await?;

        let updated = self
            .gateway
            .update_order(
                &order.id,
                OrderPatch {
                    state: Some(OrderState::Done),
                    preparation_time: Some(0),
                    time_to_service: Some(0),
                    ..Default::default()
                },
            )
            .await?;

        outcome.absorb(aggregator::close_all_partial_orders(self.gateway.as_ref(), &order.id).await?);

        info!(
            order_id = %order.id,
            cascaded = outcome.updated,
            failed = outcome.failures.len(),
            "Order settled"
        );
        let BulkOutcome { updated: succeeded, failures } = outcome;
        AppError::from_bulk(succeeded, failures)?;
        Ok(updated)
    }
}
