use super::*;
use crate::utils::now_millis;
use shared::AppError;

#[tokio::test]
async fn test_confirm_computes_timing_and_restamps() {
    let core = create_test_core();
    seed_table(&core, "t1", 1, 0);
    seed_menu(&core);

    let order = seed_order(&core, "t1", 1_000).await;
    seed_item(&core, &order.id, "p-margherita", "u1").await;
    seed_item(&core, &order.id, "p-diavola", "u2").await;
    seed_item(&core, &order.id, "p-acqua", "u1").await;

    let before = now_millis();
    let confirmed = core.state_machine.confirm(&order.id, true).await.unwrap();

    assert_eq!(confirmed.state, OrderState::Pending);
    assert!(confirmed.all_courses_together);
    // max(10, 15) on station cat-1, plus 5 on cat-2
    assert_eq!(confirmed.preparation_time, 20);
    // Empty queue: no preceding order to wait on
    assert_eq!(confirmed.time_to_service, 20);
    // Queue position follows confirmation, not first-item arrival
    assert!(confirmed.created_at >= before);
}

#[tokio::test]
async fn test_confirm_seeds_wait_from_preceding_order() {
    let core = create_test_core();
    seed_table(&core, "t1", 1, 0);
    seed_table(&core, "t2", 2, 0);
    seed_menu(&core);

    // An earlier confirmed order still waiting 30 minutes
    seed_queued_order(&core, "t2", 1_000, 12, 30).await;

    let order = seed_order(&core, "t1", 2_000).await;
    seed_item(&core, &order.id, "p-margherita", "u1").await;

    let confirmed = core.state_machine.confirm(&order.id, false).await.unwrap();
    assert_eq!(confirmed.preparation_time, 10);
    assert_eq!(confirmed.time_to_service, 10 + 30);
}

#[tokio::test]
async fn test_confirm_rejects_non_new_order() {
    let core = create_test_core();
    seed_table(&core, "t1", 1, 0);
    seed_menu(&core);

    let order = seed_order(&core, "t1", 1_000).await;
    seed_item(&core, &order.id, "p-acqua", "u1").await;
    core.state_machine.confirm(&order.id, false).await.unwrap();

    // Already Pending
    let err = core
        .state_machine
        .confirm(&order.id, false)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Done orders cannot be confirmed either
    core.state_machine
        .set_status(&order.id, OrderState::Done)
        .await
        .unwrap();
    let err = core
        .state_machine
        .confirm(&order.id, false)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_confirm_missing_order() {
    let core = create_test_core();
    let err = core
        .state_machine
        .confirm("missing", false)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_set_status_rejects_new_target() {
    let core = create_test_core();
    seed_table(&core, "t1", 1, 0);
    let order = seed_queued_order(&core, "t1", 1_000, 10, 10).await;

    let err = core
        .state_machine
        .set_status(&order.id, OrderState::New)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_set_status_same_state_is_noop() {
    let core = create_test_core();
    seed_table(&core, "t1", 1, 0);
    let order = seed_queued_order(&core, "t1", 1_000, 10, 25).await;

    let unchanged = core
        .state_machine
        .set_status(&order.id, OrderState::Pending)
        .await
        .unwrap();
    assert_eq!(unchanged.state, OrderState::Pending);
    // Timings survive the retry untouched
    assert_eq!(unchanged.preparation_time, 10);
    assert_eq!(unchanged.time_to_service, 25);
}

#[tokio::test]
async fn test_set_status_rejects_backward() {
    let core = create_test_core();
    seed_table(&core, "t1", 1, 0);
    let order = seed_queued_order(&core, "t1", 1_000, 10, 10).await;

    core.state_machine
        .set_status(&order.id, OrderState::InProgress)
        .await
        .unwrap();
    let err = core
        .state_machine
        .set_status(&order.id, OrderState::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_order_state(&core, &order.id, OrderState::InProgress).await;
}

#[tokio::test]
async fn test_states_only_move_forward_through_lifecycle() {
    let core = create_test_core();
    seed_table(&core, "t1", 1, 0);
    seed_menu(&core);

    let order = seed_order(&core, "t1", 1_000).await;
    seed_item(&core, &order.id, "p-margherita", "u1").await;

    let mut observed = vec![OrderState::New];
    core.state_machine.confirm(&order.id, false).await.unwrap();
    observed.push(OrderState::Pending);
    for target in [OrderState::InProgress, OrderState::Done, OrderState::Paid] {
        let order = core.state_machine.set_status(&order.id, target).await.unwrap();
        observed.push(order.state);
    }

    for window in observed.windows(2) {
        assert!(
            window[1].rank() > window[0].rank(),
            "observed a non-forward transition: {:?}",
            observed
        );
    }
}

#[tokio::test]
async fn test_done_zeroes_timings_and_closes_items() {
    let core = create_test_core();
    seed_table(&core, "t1", 1, 0);
    seed_menu(&core);

    let order = seed_queued_order(&core, "t1", 1_000, 20, 35).await;
    seed_item(&core, &order.id, "p-margherita", "u1").await;
    seed_item(&core, &order.id, "p-acqua", "u2").await;

    let done = core
        .state_machine
        .set_status(&order.id, OrderState::Done)
        .await
        .unwrap();
    assert_eq!(done.state, OrderState::Done);
    assert_eq!(done.preparation_time, 0);
    assert_eq!(done.time_to_service, 0);
    assert_all_items_done(&core, &order.id).await;
}

#[tokio::test]
async fn test_missing_order_not_found() {
    let core = create_test_core();
    let err = core
        .state_machine
        .set_status("missing", OrderState::Done)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
