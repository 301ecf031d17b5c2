//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product entity (read-only to the order core, except composition)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Category reference (String ID)
    pub category_id: String,
    /// Kitchen time for one unit, in minutes
    pub time_to_prepare: i64,
    /// Price in euros
    pub price: Decimal,
    pub available: bool,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub category_id: String,
    pub time_to_prepare: i64,
    pub price: Decimal,
    pub available: bool,
}
