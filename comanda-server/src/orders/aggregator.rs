//! Partial-order aggregator
//!
//! Registers one diner's single-item selection against the table's
//! current order and decides when the aggregate order is complete (every
//! cover has ordered), at which point the state machine takes over.

use futures::future::join_all;
use shared::error::FailureDetail;
use shared::models::{
    GuestCreate, Order, OrderCreate, OrderState, Participant, PartialOrder, PartialOrderCreate,
    PartialOrderState, Table,
};
use shared::{AppError, AppResult};
use std::sync::Arc;
use tracing::info;

use super::{BulkOutcome, OrderLocks, OrderStateMachine};
use crate::db::{Gateway, GuestStore, OrderStore, PartialOrderStore, ProductStore, TableStore};
use crate::utils::now_millis;

/// Aggregates diner selections into per-table orders
pub struct PartialOrderAggregator {
    gateway: Arc<dyn Gateway>,
    state_machine: Arc<OrderStateMachine>,
    locks: Arc<OrderLocks>,
}

impl PartialOrderAggregator {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        state_machine: Arc<OrderStateMachine>,
        locks: Arc<OrderLocks>,
    ) -> Self {
        Self {
            gateway,
            state_machine,
            locks,
        }
    }

    /// Register one diner's selection of one product at a table.
    ///
    /// Resolves the table's open order (creating one if the seating has
    /// none), resolves the participant (registered user, else the table
    /// session's guest, lazily created), creates the PartialOrder, then
    /// checks whether the table has reached capacity.
    ///
    /// The whole operation holds the table's write lock: two diners
    /// adding the last two covers concurrently must not both observe
    /// `count < covers`.
    pub async fn add_partial_order(
        &self,
        product_id: &str,
        table_id: &str,
        user_id: Option<&str>,
    ) -> AppResult<PartialOrder> {
        let table = self
            .gateway
            .table_by_id(table_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Table {}", table_id)))?;
        let product = self
            .gateway
            .product_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {}", product_id)))?;
        if !product.available {
            return Err(AppError::validation(format!(
                "Product {} is not available",
                product.name
            )));
        }

        let _guard = self.locks.acquire_table(table_id).await;

        let order = self.find_or_create_order(&table).await?;
        let participant = self.resolve_participant(&table, user_id).await?;

        let partial = self
            .gateway
            .create_partial_order(PartialOrderCreate {
                order_id: order.id.clone(),
                product_id: product.id.clone(),
                participant,
                created_at: now_millis(),
            })
            .await?;
        info!(
            order_id = %order.id,
            product_id = %product.id,
            "Partial order registered"
        );

        self.check_and_update_order_state(&order.id, &table.id).await?;
        Ok(partial)
    }

    /// Remove one selection of `product_id` from an order that is still
    /// editable (state New).
    pub async fn remove_product_from_order(
        &self,
        order_id: &str,
        product_id: &str,
    ) -> AppResult<bool> {
        let _guard = self.locks.acquire_order(order_id).await;

        let order = self
            .gateway
            .order_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {}", order_id)))?;
        if order.state != OrderState::New {
            return Err(AppError::conflict(format!(
                "Order {} is no longer editable (state {})",
                order_id, order.state
            )));
        }

        let partials = self.gateway.partial_orders_for_order(order_id).await?;
        let target = partials
            .iter()
            .find(|p| p.product_id == product_id)
            .ok_or_else(|| {
                AppError::not_found(format!("Product {} in order {}", product_id, order_id))
            })?;
        Ok(self.gateway.delete_partial_order(&target.id).await?)
    }

    /// The table's open order, or a fresh New one
    async fn find_or_create_order(&self, table: &Table) -> AppResult<Order> {
        if let Some(order) = self.gateway.open_order_for_table(&table.id).await? {
            return Ok(order);
        }
        let order = self
            .gateway
            .create_order(OrderCreate {
                table_id: table.id.clone(),
                state: OrderState::New,
                created_at: now_millis(),
                all_courses_together: false,
            })
            .await?;
        info!(order_id = %order.id, table_id = %table.id, "Order opened");
        Ok(order)
    }

    /// A registered user wins; otherwise the table session's guest,
    /// created on first use.
    async fn resolve_participant(
        &self,
        table: &Table,
        user_id: Option<&str>,
    ) -> AppResult<Participant> {
        if let Some(id) = user_id {
            if id.trim().is_empty() {
                return Err(AppError::validation("Empty user reference"));
            }
            return Ok(Participant::User(id.to_string()));
        }
        if let Some(guest) = self.gateway.guest_by_session(&table.session_code).await? {
            return Ok(Participant::Guest(guest.id));
        }
        let guest = self
            .gateway
            .create_guest(GuestCreate {
                session_code: table.session_code.clone(),
                created_at: now_millis(),
            })
            .await?;
        Ok(Participant::Guest(guest.id))
    }

    /// Auto-confirmation: once every expected cover has ordered, the
    /// order is submitted without an explicit confirm call.
    ///
    /// Covers are reloaded here; the table may have been reseated since
    /// the request started. An explicit confirmation that landed first
    /// wins; its `Conflict` is a benign no-op for this path.
    async fn check_and_update_order_state(&self, order_id: &str, table_id: &str) -> AppResult<()> {
        let covers = self
            .gateway
            .table_by_id(table_id)
            .await?
            .map(|t| t.covers)
            .unwrap_or(0);
        if covers <= 0 {
            return Ok(());
        }
        let count = self.gateway.count_partial_orders(order_id).await?;
        if count < covers as u64 {
            return Ok(());
        }
        match self.state_machine.confirm(order_id, false).await {
            Ok(_) => {
                info!(order_id = %order_id, covers, "Order auto-confirmed at capacity");
                Ok(())
            }
            Err(AppError::Conflict(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Force every Pending PartialOrder of a settled order to Done.
///
/// One update per record, awaited as a batch; failures are aggregated
/// into the caller's outcome instead of being dropped.
pub async fn close_all_partial_orders(
    gateway: &dyn Gateway,
    order_id: &str,
) -> AppResult<BulkOutcome> {
    let partials = gateway.partial_orders_for_order(order_id).await?;
    let pending = partials
        .into_iter()
        .filter(|p| p.state == PartialOrderState::Pending);

    let updates = pending.map(|partial| async move {
        let result = gateway
            .update_partial_order_state(&partial.id, PartialOrderState::Done)
            .await;
        (partial.id, result)
    });

    let mut outcome = BulkOutcome::default();
    for (id, result) in join_all(updates).await {
        match result {
            Ok(_) => outcome.updated += 1,
            Err(e) => outcome.failures.push(FailureDetail::new(id, e.to_string())),
        }
    }
    Ok(outcome)
}
