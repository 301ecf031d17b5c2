//! Preparation-time scheduler
//!
//! Computes how long a pending order takes to prepare, where it lands in
//! the shared preparation queue, and propagates timing adjustments to
//! later orders when an earlier one settles.
//!
//! # Station model
//!
//! Each category maps to one kitchen station. Items within a category
//! serialize on their station, so the slowest item bounds that station's
//! contribution; distinct categories run in parallel, so their
//! contributions add up:
//!
//! ```text
//! prep_time = Σ over categories ( max time_to_prepare in category )
//! ```

use futures::future::join_all;
use shared::error::FailureDetail;
use shared::models::Order;
use shared::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::BulkOutcome;
use crate::db::{Gateway, OrderStore, PartialOrderStore, ProductStore};

/// Computes and propagates order timing
pub struct PreparationTimeScheduler {
    gateway: Arc<dyn Gateway>,
}

impl PreparationTimeScheduler {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Total kitchen minutes for one order, per the category-max-sum
    /// model.
    ///
    /// The snapshot is every PartialOrder belonging to the order: order
    /// identity is the filter, item state plays no part.
    pub async fn calculate_prep_time(&self, order_id: &str) -> AppResult<i64> {
        let partials = self.gateway.partial_orders_for_order(order_id).await?;
        if partials.is_empty() {
            return Ok(0);
        }

        let mut product_ids: Vec<String> =
            partials.iter().map(|p| p.product_id.clone()).collect();
        product_ids.sort();
        product_ids.dedup();

        let products = self.gateway.products_by_ids(&product_ids).await?;
        if products.len() != product_ids.len() {
            return Err(AppError::not_found("Product referenced by order"));
        }

        let mut station_load: HashMap<&str, i64> = HashMap::new();
        for product in &products {
            let slot = station_load.entry(product.category_id.as_str()).or_insert(0);
            *slot = (*slot).max(product.time_to_prepare);
        }
        let total = station_load.values().sum();
        debug!(
            order_id = %order_id,
            stations = station_load.len(),
            prep_min = total,
            "Preparation time computed"
        );
        Ok(total)
    }

    /// The most recently confirmed order (state != New) stamped strictly
    /// before `ts`; seeds a newly confirmed order's queue wait.
    pub async fn order_before(&self, ts: i64) -> AppResult<Option<Order>> {
        Ok(self.gateway.latest_confirmed_before(ts).await?)
    }

    /// Add `delta` minutes of time-to-service to every order stamped
    /// strictly after `ts` that is still queued (Pending or InProgress).
    ///
    /// One update per affected order, awaited as a single batch. Partial
    /// completion corrupts every later order's displayed wait, so the
    /// outcome carries a per-order failure list for the caller to surface
    /// as a `PartialFailure`.
    pub async fn edit_orders_after(&self, ts: i64, delta: i64) -> AppResult<BulkOutcome> {
        let queued = self.gateway.queued_after(ts).await?;
        if queued.is_empty() {
            return Ok(BulkOutcome::default());
        }

        let updates = queued.iter().map(|order| {
            let gateway = &self.gateway;
            let id = order.id.clone();
            async move {
                let result = gateway.adjust_time_to_service(&id, delta).await;
                (id, result)
            }
        });

        let mut outcome = BulkOutcome::default();
        for (id, result) in join_all(updates).await {
            match result {
                Ok(_) => outcome.updated += 1,
                Err(e) => {
                    warn!(order_id = %id, error = %e, "Cascade update failed");
                    outcome.failures.push(FailureDetail::new(id, e.to_string()));
                }
            }
        }
        debug!(
            after_ts = ts,
            delta_min = delta,
            updated = outcome.updated,
            failed = outcome.failures.len(),
            "Cascade applied"
        );
        Ok(outcome)
    }
}
