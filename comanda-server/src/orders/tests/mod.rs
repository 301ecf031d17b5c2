use std::sync::Arc;

use rust_decimal::Decimal;
use shared::models::{
    Category, CategoryKind, Order, OrderCreate, OrderPatch, OrderState, Participant,
    PartialOrderCreate, PartialOrderState, Product, Table,
};

use crate::db::{Gateway, GuestStore, MemoryGateway, OrderStore, PartialOrderStore};

use super::{OrderLocks, OrderStateMachine, PartialOrderAggregator, PreparationTimeScheduler};

/// Wired core on top of a fresh in-memory gateway
pub struct TestCore {
    pub gateway: Arc<MemoryGateway>,
    pub state_machine: Arc<OrderStateMachine>,
    pub aggregator: Arc<PartialOrderAggregator>,
    pub scheduler: Arc<PreparationTimeScheduler>,
}

pub fn create_test_core() -> TestCore {
    let gateway = Arc::new(MemoryGateway::new());
    let dyn_gateway: Arc<dyn Gateway> = gateway.clone();
    let locks = Arc::new(OrderLocks::new());
    let scheduler = Arc::new(PreparationTimeScheduler::new(dyn_gateway.clone()));
    let state_machine = Arc::new(OrderStateMachine::new(
        dyn_gateway.clone(),
        scheduler.clone(),
        locks.clone(),
    ));
    let aggregator = Arc::new(PartialOrderAggregator::new(
        dyn_gateway,
        state_machine.clone(),
        locks,
    ));
    TestCore {
        gateway,
        state_machine,
        aggregator,
        scheduler,
    }
}

// ========================================================================
// Seeding helpers
// ========================================================================

pub fn seed_table(core: &TestCore, id: &str, number: i32, covers: i32) {
    core.gateway.insert_table(Table {
        id: id.to_string(),
        number,
        access_code: format!("AC{}", number),
        session_code: format!("S{}", number),
        covers,
        check_request: false,
    });
}

pub fn seed_product(core: &TestCore, id: &str, category_id: &str, prep_min: i64, price: Decimal) {
    core.gateway.insert_category(Category {
        id: category_id.to_string(),
        name: category_id.to_string(),
        kind: CategoryKind::Pizza,
    });
    core.gateway.insert_product(Product {
        id: id.to_string(),
        name: id.to_string(),
        category_id: category_id.to_string(),
        time_to_prepare: prep_min,
        price,
        available: true,
    });
}

/// Standard menu used by most scenarios:
/// two pizzas on station cat-1 (10 and 15 min), one drink on cat-2 (5 min)
pub fn seed_menu(core: &TestCore) {
    seed_product(core, "p-margherita", "cat-1", 10, Decimal::new(650, 2));
    seed_product(core, "p-diavola", "cat-1", 15, Decimal::new(800, 2));
    seed_product(core, "p-acqua", "cat-2", 5, Decimal::new(100, 2));
}

/// Create an order directly through the gateway (bypassing the
/// aggregator) so scenarios control the ordering key.
pub async fn seed_order(core: &TestCore, table_id: &str, created_at: i64) -> Order {
    core.gateway
        .create_order(OrderCreate {
            table_id: table_id.to_string(),
            state: OrderState::New,
            created_at,
            all_courses_together: false,
        })
        .await
        .unwrap()
}

/// A confirmed order sitting in the queue with controlled timings
pub async fn seed_queued_order(
    core: &TestCore,
    table_id: &str,
    created_at: i64,
    prep_min: i64,
    service_min: i64,
) -> Order {
    let order = seed_order(core, table_id, created_at).await;
    core.gateway
        .update_order(
            &order.id,
            OrderPatch {
                state: Some(OrderState::Pending),
                preparation_time: Some(prep_min),
                time_to_service: Some(service_min),
                ..Default::default()
            },
        )
        .await
        .unwrap()
}

/// Attach one selection to an order directly through the gateway
pub async fn seed_item(core: &TestCore, order_id: &str, product_id: &str, user: &str) {
    core.gateway
        .create_partial_order(PartialOrderCreate {
            order_id: order_id.to_string(),
            product_id: product_id.to_string(),
            participant: Participant::User(user.to_string()),
            created_at: 0,
        })
        .await
        .unwrap();
}

// ========================================================================
// Assertion helpers
// ========================================================================

pub async fn assert_order_state(core: &TestCore, order_id: &str, expected: OrderState) {
    let order = core
        .gateway
        .order_by_id(order_id)
        .await
        .unwrap()
        .expect("order exists");
    assert_eq!(
        order.state, expected,
        "Expected order state {:?}, got {:?}",
        expected, order.state
    );
}

pub async fn assert_all_items_done(core: &TestCore, order_id: &str) {
    let partials = core
        .gateway
        .partial_orders_for_order(order_id)
        .await
        .unwrap();
    assert!(!partials.is_empty(), "order has no items");
    for partial in partials {
        assert_eq!(
            partial.state,
            PartialOrderState::Done,
            "partial order {} not closed",
            partial.id
        );
    }
}

mod test_scheduler;
mod test_state_machine;
