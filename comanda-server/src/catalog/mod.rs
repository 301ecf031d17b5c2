//! Catalog interaction for diner-composed products
//!
//! The order core treats the product catalog as read-only, with one
//! exception: diners may compose a custom product (a pizza built from a
//! base and toppings). [`preprocess`] owns the per-category rules that
//! decide whether a composition is allowed and what it costs.

pub mod preprocess;

pub use preprocess::{ComposeDraft, Preprocessor};
