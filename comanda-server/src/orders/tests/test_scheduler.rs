use super::*;
use shared::AppError;

#[tokio::test]
async fn test_prep_time_is_per_station_max_summed() {
    let core = create_test_core();
    seed_table(&core, "t1", 1, 0);
    // A(cat-1, 10), B(cat-1, 15), C(cat-2, 5)
    seed_menu(&core);

    let order = seed_order(&core, "t1", 1_000).await;
    seed_item(&core, &order.id, "p-margherita", "u1").await;
    seed_item(&core, &order.id, "p-diavola", "u2").await;
    seed_item(&core, &order.id, "p-acqua", "u3").await;

    // max(10, 15) + 5 = 20
    assert_eq!(core.scheduler.calculate_prep_time(&order.id).await.unwrap(), 20);
}

#[tokio::test]
async fn test_prep_time_ignores_insertion_order() {
    let core = create_test_core();
    seed_table(&core, "t1", 1, 0);
    seed_table(&core, "t2", 2, 0);
    seed_menu(&core);

    let forward = seed_order(&core, "t1", 1_000).await;
    for product in ["p-margherita", "p-diavola", "p-acqua"] {
        seed_item(&core, &forward.id, product, "u1").await;
    }
    let backward = seed_order(&core, "t2", 2_000).await;
    for product in ["p-acqua", "p-diavola", "p-margherita"] {
        seed_item(&core, &backward.id, product, "u1").await;
    }

    let a = core.scheduler.calculate_prep_time(&forward.id).await.unwrap();
    let b = core.scheduler.calculate_prep_time(&backward.id).await.unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_prep_time_counts_only_this_order() {
    let core = create_test_core();
    seed_table(&core, "t1", 1, 0);
    seed_table(&core, "t2", 2, 0);
    seed_menu(&core);

    let mine = seed_order(&core, "t1", 1_000).await;
    seed_item(&core, &mine.id, "p-acqua", "u1").await;

    // A big order on another table must not leak into the snapshot
    let other = seed_order(&core, "t2", 1_001).await;
    seed_item(&core, &other.id, "p-diavola", "u2").await;

    assert_eq!(core.scheduler.calculate_prep_time(&mine.id).await.unwrap(), 5);
}

#[tokio::test]
async fn test_prep_time_empty_order_is_zero() {
    let core = create_test_core();
    seed_table(&core, "t1", 1, 0);
    let order = seed_order(&core, "t1", 1_000).await;
    assert_eq!(core.scheduler.calculate_prep_time(&order.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_prep_time_missing_product_surfaces() {
    let core = create_test_core();
    seed_table(&core, "t1", 1, 0);
    let order = seed_order(&core, "t1", 1_000).await;
    seed_item(&core, &order.id, "p-ghost", "u1").await;

    let err = core.scheduler.calculate_prep_time(&order.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_order_before_picks_latest_confirmed() {
    let core = create_test_core();
    seed_table(&core, "t1", 1, 0);

    let early = seed_queued_order(&core, "t1", 100, 10, 30).await;
    let late = seed_queued_order(&core, "t1", 200, 15, 45).await;
    // A New order in between never counts as queue state
    seed_order(&core, "t1", 150).await;

    let before = core.scheduler.order_before(250).await.unwrap().unwrap();
    assert_eq!(before.id, late.id);

    // Strictly before: an order stamped exactly at ts is excluded
    let before = core.scheduler.order_before(200).await.unwrap().unwrap();
    assert_eq!(before.id, early.id);

    assert!(core.scheduler.order_before(50).await.unwrap().is_none());
}

#[tokio::test]
async fn test_edit_orders_after_shifts_only_queued_later_orders() {
    let core = create_test_core();
    seed_table(&core, "t1", 1, 0);

    // Before the pivot: untouched
    let earlier = seed_queued_order(&core, "t1", 500, 10, 10).await;
    // After the pivot, queued: shifted
    let pending = seed_queued_order(&core, "t1", 2_000, 15, 25).await;
    let in_progress = seed_queued_order(&core, "t1", 3_000, 5, 30).await;
    core.gateway
        .update_order(
            &in_progress.id,
            OrderPatch {
                state: Some(OrderState::InProgress),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    // After the pivot but already settled: untouched
    let done = seed_queued_order(&core, "t1", 4_000, 5, 35).await;
    core.gateway
        .update_order(
            &done.id,
            OrderPatch {
                state: Some(OrderState::Done),
                preparation_time: Some(0),
                time_to_service: Some(0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let outcome = core.scheduler.edit_orders_after(1_000, -10).await.unwrap();
    assert_eq!(outcome.updated, 2);
    assert!(outcome.failures.is_empty());

    let get = |id: &str| {
        let core = &core;
        let id = id.to_string();
        async move { core.gateway.order_by_id(&id).await.unwrap().unwrap() }
    };
    assert_eq!(get(&earlier.id).await.time_to_service, 10);
    assert_eq!(get(&pending.id).await.time_to_service, 15);
    assert_eq!(get(&in_progress.id).await.time_to_service, 20);
    assert_eq!(get(&done.id).await.time_to_service, 0);
}

#[tokio::test]
async fn test_edit_orders_after_empty_queue() {
    let core = create_test_core();
    let outcome = core.scheduler.edit_orders_after(1_000, -10).await.unwrap();
    assert_eq!(outcome.updated, 0);
    assert!(outcome.failures.is_empty());
}
