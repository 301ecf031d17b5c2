//! Fidelity discount calculator
//!
//! Accrues loyalty points from purchases (one point per euro spent,
//! rounded up) and computes the discount a table has earned from its
//! participants' accumulated points.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use shared::error::FailureDetail;
use shared::models::{FidelityCard, FidelityCardCreate, FidelityCardPatch, ResetOutcome};
use shared::{AppError, AppResult};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

use crate::db::{
    FidelityCardStore, Gateway, OrderStore, PartialOrderStore, ProductStore, TableStore,
};

/// Monetary value of one fidelity point: 0.05 euro
pub const POINT_VALUE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Result of a batch accrual
#[derive(Debug, Clone, Serialize)]
pub struct AccrualResult {
    pub points_earned: i64,
    pub total_points: i64,
}

/// Accrues points and reconciles table discounts
pub struct FidelityDiscountCalculator {
    gateway: Arc<dyn Gateway>,
}

impl FidelityDiscountCalculator {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Accrue `ceil(price)` points per purchased product, in one batch.
    ///
    /// The whole batch is rejected (no partial accrual) when any
    /// referenced product is missing or priced invalidly. The card is
    /// created on first accrual and updated exactly once per batch.
    pub async fn accrue(&self, user_id: &str, product_ids: &[String]) -> AppResult<AccrualResult> {
        if user_id.trim().is_empty() {
            return Err(AppError::validation("Missing user reference"));
        }
        if product_ids.is_empty() {
            return Err(AppError::validation("No products in purchase"));
        }

        let products = self.gateway.products_by_ids(product_ids).await?;
        if products.len() != product_ids.len() {
            return Err(AppError::not_found("Product in purchase"));
        }

        let mut points_earned: i64 = 0;
        for product in &products {
            if product.price <= Decimal::ZERO {
                return Err(AppError::validation(format!(
                    "Product {} has an invalid price",
                    product.name
                )));
            }
            let points = product
                .price
                .ceil()
                .to_i64()
                .ok_or_else(|| AppError::internal("Point conversion overflow"))?;
            points_earned += points;
        }

        let total_points = match self.gateway.card_by_user(user_id).await? {
            Some(card) => {
                let updated = self
                    .gateway
                    .update_card(
                        &card.id,
                        FidelityCardPatch {
                            points: Some(card.points + points_earned),
                            ..Default::default()
                        },
                    )
                    .await?;
                updated.points
            }
            None => {
                let card = self
                    .gateway
                    .create_card(FidelityCardCreate {
                        user_id: user_id.to_string(),
                        points: points_earned,
                        use_points: None,
                    })
                    .await?;
                card.points
            }
        };

        info!(
            user_id = %user_id,
            points_earned,
            total_points,
            "Fidelity points accrued"
        );
        Ok(AccrualResult {
            points_earned,
            total_points,
        })
    }

    /// Total discount a table has earned: the distinct registered
    /// participants across all the table's orders, their card points
    /// summed, times [`POINT_VALUE`]. Participants without a card (and
    /// guests) contribute zero.
    pub async fn discount_for_table(&self, table_number: i32) -> AppResult<Decimal> {
        let table = self
            .gateway
            .table_by_number(table_number)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Table {}", table_number)))?;

        let orders = self.gateway.orders_for_table(&table.id, None).await?;
        let mut participants: BTreeSet<String> = BTreeSet::new();
        for order in &orders {
            let partials = self.gateway.partial_orders_for_order(&order.id).await?;
            participants.extend(
                partials
                    .iter()
                    .filter_map(|p| p.participant.user_id())
                    .map(str::to_string),
            );
        }

        let mut total_points: i64 = 0;
        for user_id in &participants {
            if let Some(card) = self.gateway.card_by_user(user_id).await? {
                total_points += card.points;
            }
        }

        Ok(Decimal::from(total_points) * POINT_VALUE)
    }

    /// Set the tri-state redemption preference. Points are untouched.
    pub async fn toggle_use_points(
        &self,
        user_id: &str,
        value: Option<bool>,
    ) -> AppResult<FidelityCard> {
        let card = self
            .gateway
            .card_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("FidelityCard for user {}", user_id)))?;
        Ok(self
            .gateway
            .update_card(
                &card.id,
                FidelityCardPatch {
                    use_points: Some(value),
                    ..Default::default()
                },
            )
            .await?)
    }

    /// Fetch a user's card
    pub async fn card_for_user(&self, user_id: &str) -> AppResult<FidelityCard> {
        self.gateway
            .card_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("FidelityCard for user {}", user_id)))
    }

    /// Zero the points of every user whose card has redemption enabled.
    ///
    /// Partial success is the expected shape here: the outcome carries a
    /// success list and a per-user failure list, and the call itself
    /// succeeds either way.
    pub async fn reset_points(&self, user_ids: &[String]) -> AppResult<ResetOutcome> {
        let mut outcome = ResetOutcome {
            success: Vec::new(),
            failed: Vec::new(),
        };
        for user_id in user_ids {
            match self.gateway.card_by_user(user_id).await? {
                None => outcome
                    .failed
                    .push(FailureDetail::new(user_id, "card not found")),
                Some(card) if card.use_points != Some(true) => outcome
                    .failed
                    .push(FailureDetail::new(user_id, "use-points not enabled")),
                Some(card) => {
                    match self
                        .gateway
                        .update_card(
                            &card.id,
                            FidelityCardPatch {
                                points: Some(0),
                                ..Default::default()
                            },
                        )
                        .await
                    {
                        Ok(_) => outcome.success.push(user_id.clone()),
                        Err(e) => outcome.failed.push(FailureDetail::new(user_id, e.to_string())),
                    }
                }
            }
        }
        info!(
            reset = outcome.success.len(),
            failed = outcome.failed.len(),
            "Fidelity points reset"
        );
        Ok(outcome)
    }
}
