//! Category Model
//!
//! A category maps to one kitchen station: items within a category
//! serialize on that station, distinct categories run in parallel.

use serde::{Deserialize, Serialize};

/// Closed set of category kinds, used to resolve the composition rule
/// for each category once at startup. Unhandled kinds are impossible by
/// construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryKind {
    Pizza,
    Antipasto,
    Bevanda,
    Dolce,
}

/// Category entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub kind: CategoryKind,
}
