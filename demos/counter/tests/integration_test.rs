//! Integration tests for the counter module with a Store
//!
//! These tests demonstrate the full end-to-end flow: factory-built module,
//! action creators and store dispatch.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use counter::{counter_module, CounterState, RESET};
use ducks_core::Action;
use ducks_runtime::Store;
use proptest::prelude::*;

#[tokio::test]
async fn test_counter_with_store() {
    let counter = counter_module().unwrap();
    let store = Store::from_module(&counter);

    let increment = counter.action("increment").unwrap();
    let decrement = counter.action("decrement").unwrap();

    // Initial state
    assert_eq!(store.state(|s| s.count).await, 0);

    store.send_empty(increment).await.unwrap();
    assert_eq!(store.state(|s| s.count).await, 1);

    store.send_empty(increment).await.unwrap();
    assert_eq!(store.state(|s| s.count).await, 2);

    store.send_empty(decrement).await.unwrap();
    assert_eq!(store.state(|s| s.count).await, 1);

    store.dispatch(Action::new(RESET)).await.unwrap();
    assert_eq!(store.state(Clone::clone).await, CounterState::default());
}

#[tokio::test]
async fn test_state_isolation() {
    let counter = counter_module().unwrap();
    let increment = counter.action("increment").unwrap();

    let store1 = Store::from_module(&counter);
    let store2 = Store::from_module(&counter);

    store1.send_empty(increment).await.unwrap();
    store1.send_empty(increment).await.unwrap();
    store2.send_empty(increment).await.unwrap();

    assert_eq!(store1.state(|s| s.count).await, 2);
    assert_eq!(store2.state(|s| s.count).await, 1);
}

#[tokio::test]
async fn test_negative_count() {
    let counter = counter_module().unwrap();
    let store = Store::from_module(&counter);
    let decrement = counter.action("decrement").unwrap();

    for _ in 0..3 {
        store.send_empty(decrement).await.unwrap();
    }

    let state = store.state(Clone::clone).await;
    assert_eq!(state.count, -3);
    assert_eq!(state.high_water, 0);
}

#[tokio::test]
async fn test_large_counts_saturate() {
    let counter = counter_module().unwrap();
    let store = Store::new(
        CounterState {
            count: i64::MAX - 1,
            high_water: i64::MAX - 1,
        },
        counter.reducer.clone(),
    );

    for _ in 0..3 {
        store.send_empty(counter.action("increment").unwrap()).await.unwrap();
    }

    assert_eq!(store.state(|s| s.count).await, i64::MAX);
}

proptest! {
    #[test]
    fn prop_high_water_never_below_count(amounts in prop::collection::vec(-100_i64..100, 0..32)) {
        let counter = counter_module().unwrap();
        let increment_by = counter.action("incrementBy").unwrap();

        let mut state = counter.initial_state.clone();
        for amount in amounts {
            state = counter.reduce(state, &increment_by.create(amount));
            prop_assert!(state.high_water >= state.count);
        }
    }
}
