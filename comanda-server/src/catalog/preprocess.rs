//! Per-category composition rules
//!
//! Composition used to be dispatched through a table keyed by category
//! *name*; a typo'd category silently skipped validation. The rules are
//! now a closed enum over [`CategoryKind`]: every kind resolves to a
//! strategy at startup, and an unhandled kind fails to compile.

use enum_dispatch::enum_dispatch;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::models::{Category, CategoryKind, Ingredient, IngredientKind, Product, ProductCreate};
use shared::{AppError, AppResult};
use std::collections::HashMap;
use tracing::info;

use crate::db::{CategoryStore, Gateway, IngredientStore, ProductStore};

/// Kitchen minutes assigned to a freshly composed pizza
const COMPOSED_PIZZA_PREP_MIN: i64 = 10;

/// A diner's composition request, as it arrives at the boundary
#[derive(Debug, Clone, Deserialize)]
pub struct ComposeDraft {
    pub category_id: String,
    pub base_id: Option<String>,
    pub ingredient_ids: Vec<String>,
}

/// Resolved records the rule validates against
pub struct ComposeContext<'a> {
    pub category: &'a Category,
    pub base: Option<&'a Ingredient>,
    pub toppings: &'a [Ingredient],
}

/// A validated, priced composition
#[derive(Debug, Clone)]
pub struct PricedDraft {
    pub name: String,
    pub price: Decimal,
    pub time_to_prepare: i64,
}

/// Validate a composition draft and price it
#[enum_dispatch]
pub trait ValidateAndPrice {
    fn validate_and_price(&self, ctx: &ComposeContext<'_>) -> AppResult<PricedDraft>;
}

/// Pizza: exactly one base, at least one topping, no base smuggled in as
/// a topping. Price is the base plus every topping.
#[derive(Debug, Clone, Copy)]
pub struct PizzaRule;

impl ValidateAndPrice for PizzaRule {
    fn validate_and_price(&self, ctx: &ComposeContext<'_>) -> AppResult<PricedDraft> {
        let base = ctx
            .base
            .ok_or_else(|| AppError::validation("A composed pizza needs a base"))?;
        if base.kind != IngredientKind::PizzaBase {
            return Err(AppError::validation(format!(
                "Ingredient {} is not a pizza base",
                base.name
            )));
        }
        if ctx.toppings.is_empty() {
            return Err(AppError::validation("A composed pizza needs toppings"));
        }
        if ctx
            .toppings
            .iter()
            .any(|i| i.kind == IngredientKind::PizzaBase)
        {
            return Err(AppError::validation(
                "Only one base is allowed on a composed pizza",
            ));
        }

        let price = base.price
            + ctx
                .toppings
                .iter()
                .map(|i| i.price)
                .sum::<Decimal>();
        Ok(PricedDraft {
            name: format!("Custom {}", ctx.category.name),
            price,
            time_to_prepare: COMPOSED_PIZZA_PREP_MIN,
        })
    }
}

/// Categories that do not admit composition at all
#[derive(Debug, Clone, Copy)]
pub struct DenyRule;

impl ValidateAndPrice for DenyRule {
    fn validate_and_price(&self, ctx: &ComposeContext<'_>) -> AppResult<PricedDraft> {
        Err(AppError::validation(format!(
            "Products in category {} cannot be composed",
            ctx.category.name
        )))
    }
}

/// Strategy for one category kind
#[enum_dispatch(ValidateAndPrice)]
pub enum CategoryRule {
    Pizza(PizzaRule),
    Deny(DenyRule),
}

/// Exhaustive kind → rule resolution; adding a kind without a rule is a
/// compile error.
fn rule_for_kind(kind: CategoryKind) -> CategoryRule {
    match kind {
        CategoryKind::Pizza => CategoryRule::Pizza(PizzaRule),
        CategoryKind::Antipasto => CategoryRule::Deny(DenyRule),
        CategoryKind::Bevanda => CategoryRule::Deny(DenyRule),
        CategoryKind::Dolce => CategoryRule::Deny(DenyRule),
    }
}

const ALL_KINDS: [CategoryKind; 4] = [
    CategoryKind::Pizza,
    CategoryKind::Antipasto,
    CategoryKind::Bevanda,
    CategoryKind::Dolce,
];

/// The strategy map, resolved once at startup
pub struct Preprocessor {
    rules: HashMap<CategoryKind, CategoryRule>,
}

impl Preprocessor {
    pub fn new() -> Self {
        let rules = ALL_KINDS
            .into_iter()
            .map(|kind| (kind, rule_for_kind(kind)))
            .collect();
        Self { rules }
    }

    fn rule_for(&self, kind: CategoryKind) -> &CategoryRule {
        // Every kind is inserted in new(); the map is total
        &self.rules[&kind]
    }

    /// Validate, price and create a diner-composed product.
    ///
    /// Records are resolved up front so the rules themselves stay pure.
    pub async fn compose_product(
        &self,
        gateway: &dyn Gateway,
        draft: ComposeDraft,
    ) -> AppResult<Product> {
        let category = gateway
            .category_by_id(&draft.category_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Category {}", draft.category_id)))?;

        let base = match &draft.base_id {
            Some(id) => Some(
                gateway
                    .ingredient_by_id(id)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Ingredient {}", id)))?,
            ),
            None => None,
        };
        let toppings = gateway.ingredients_by_ids(&draft.ingredient_ids).await?;
        if toppings.len() != draft.ingredient_ids.len() {
            return Err(AppError::not_found("Ingredient in composition"));
        }

        let ctx = ComposeContext {
            category: &category,
            base: base.as_ref(),
            toppings: &toppings,
        };
        let priced = self.rule_for(category.kind).validate_and_price(&ctx)?;

        let product = gateway
            .create_product(ProductCreate {
                name: priced.name,
                category_id: category.id.clone(),
                time_to_prepare: priced.time_to_prepare,
                price: priced.price,
                available: true,
            })
            .await?;
        info!(
            product_id = %product.id,
            category = %category.name,
            price = %product.price,
            "Composed product created"
        );
        Ok(product)
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
