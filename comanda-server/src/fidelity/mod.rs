//! Fidelity (loyalty) domain
//!
//! Point accrual per purchase and discount reconciliation at checkout.

pub mod calculator;

pub use calculator::{AccrualResult, FidelityDiscountCalculator, POINT_VALUE};
