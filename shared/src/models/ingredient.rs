//! Ingredient Model
//!
//! Building blocks for diner-composed products (custom pizzas).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ingredient kind. A pizza needs exactly one base.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngredientKind {
    PizzaBase,
    Topping,
}

/// Ingredient entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub kind: IngredientKind,
    /// Price contribution in euros
    pub price: Decimal,
}
