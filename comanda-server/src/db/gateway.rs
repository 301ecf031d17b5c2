//! Gateway contract: typed record access consumed by the order core
//!
//! Per-entity store traits unified under the [`Gateway`] supertrait.
//! The backing repository guarantees per-record atomic read-modify-write
//! and nothing more: no multi-record transactions. Multi-record
//! invariants are the core's own job.

use async_trait::async_trait;
use shared::models::{
    Category, FidelityCard, FidelityCardCreate, FidelityCardPatch, Guest, GuestCreate, Ingredient,
    Order, OrderCreate, OrderPatch, OrderState, PartialOrder, PartialOrderCreate,
    PartialOrderState, Product, ProductCreate, Table,
};
use thiserror::Error;

/// Gateway error types
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<DbError> for shared::AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(msg) => shared::AppError::NotFound(msg),
            DbError::Database(msg) => shared::AppError::Database(msg),
            DbError::Validation(msg) => shared::AppError::Validation(msg),
        }
    }
}

/// Result type for gateway operations
pub type DbResult<T> = Result<T, DbError>;

/// Order records
#[async_trait]
pub trait OrderStore {
    async fn create_order(&self, data: OrderCreate) -> DbResult<Order>;
    async fn order_by_id(&self, id: &str) -> DbResult<Option<Order>>;
    async fn update_order(&self, id: &str, patch: OrderPatch) -> DbResult<Order>;
    /// The table's currently-open order (state New), if any
    async fn open_order_for_table(&self, table_id: &str) -> DbResult<Option<Order>>;
    /// All orders for a table, ascending by ordering key; with `since`,
    /// only orders stamped strictly after it
    async fn orders_for_table(&self, table_id: &str, since: Option<i64>) -> DbResult<Vec<Order>>;
    /// Most recently confirmed order (state != New) stamped strictly
    /// before `ts`
    async fn latest_confirmed_before(&self, ts: i64) -> DbResult<Option<Order>>;
    /// Orders stamped strictly after `ts` still in the preparation queue
    /// (Pending or InProgress), ascending by ordering key
    async fn queued_after(&self, ts: i64) -> DbResult<Vec<Order>>;
    /// Atomically add `delta` minutes to an order's time_to_service,
    /// clamped at zero. Skips (returns the unchanged record) when the
    /// order has already left the queue.
    async fn adjust_time_to_service(&self, id: &str, delta: i64) -> DbResult<Order>;
    /// Number of the table's orders not yet paid
    async fn count_unpaid_for_table(&self, table_id: &str) -> DbResult<u64>;
}

/// Partial order records
#[async_trait]
pub trait PartialOrderStore {
    async fn create_partial_order(&self, data: PartialOrderCreate) -> DbResult<PartialOrder>;
    async fn partial_orders_for_order(&self, order_id: &str) -> DbResult<Vec<PartialOrder>>;
    async fn count_partial_orders(&self, order_id: &str) -> DbResult<u64>;
    async fn update_partial_order_state(
        &self,
        id: &str,
        state: PartialOrderState,
    ) -> DbResult<PartialOrder>;
    async fn delete_partial_order(&self, id: &str) -> DbResult<bool>;
}

/// Table records
#[async_trait]
pub trait TableStore {
    async fn table_by_id(&self, id: &str) -> DbResult<Option<Table>>;
    async fn table_by_number(&self, number: i32) -> DbResult<Option<Table>>;
    async fn table_by_access_code(&self, access_code: &str) -> DbResult<Option<Table>>;
    /// Set the monotonic bill-requested flag
    async fn set_check_request(&self, id: &str) -> DbResult<Table>;
}

/// Product records (read-only except composition)
#[async_trait]
pub trait ProductStore {
    async fn product_by_id(&self, id: &str) -> DbResult<Option<Product>>;
    async fn products_by_ids(&self, ids: &[String]) -> DbResult<Vec<Product>>;
    async fn create_product(&self, data: ProductCreate) -> DbResult<Product>;
}

/// Category records
#[async_trait]
pub trait CategoryStore {
    async fn category_by_id(&self, id: &str) -> DbResult<Option<Category>>;
}

/// Ingredient records
#[async_trait]
pub trait IngredientStore {
    async fn ingredient_by_id(&self, id: &str) -> DbResult<Option<Ingredient>>;
    async fn ingredients_by_ids(&self, ids: &[String]) -> DbResult<Vec<Ingredient>>;
}

/// Guest records
#[async_trait]
pub trait GuestStore {
    async fn guest_by_session(&self, session_code: &str) -> DbResult<Option<Guest>>;
    async fn create_guest(&self, data: GuestCreate) -> DbResult<Guest>;
}

/// Fidelity card records
#[async_trait]
pub trait FidelityCardStore {
    async fn card_by_user(&self, user_id: &str) -> DbResult<Option<FidelityCard>>;
    async fn create_card(&self, data: FidelityCardCreate) -> DbResult<FidelityCard>;
    async fn update_card(&self, id: &str, patch: FidelityCardPatch) -> DbResult<FidelityCard>;
}

/// The full Repository Gateway contract
///
/// Components hold `Arc<dyn Gateway>`; tests substitute the in-memory
/// backend (or a failure-injecting wrapper) without touching the core.
pub trait Gateway:
    OrderStore
    + PartialOrderStore
    + TableStore
    + ProductStore
    + CategoryStore
    + IngredientStore
    + GuestStore
    + FidelityCardStore
    + Send
    + Sync
{
}

impl<T> Gateway for T where
    T: OrderStore
        + PartialOrderStore
        + TableStore
        + ProductStore
        + CategoryStore
        + IngredientStore
        + GuestStore
        + FidelityCardStore
        + Send
        + Sync
{
}

/// Convenience: is this order still waiting in the preparation queue?
pub fn is_queued(state: OrderState) -> bool {
    matches!(state, OrderState::Pending | OrderState::InProgress)
}
