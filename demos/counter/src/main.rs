//! Counter example binary
//!
//! Builds the counter module with the factory and drives it through a store.

use anyhow::Context;
use counter::{counter_module, RESET};
use ducks_core::Action;
use ducks_runtime::Store;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "counter=debug,ducks_core=debug,ducks_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Counter Example: Ducks module factory ===\n");

    let counter = counter_module()?;

    tracing::info!(module = %counter.name, actions = counter.actions.len(), "Counter module built");
    for name in counter.action_names() {
        tracing::info!(action = %name, constant = counter.constant(name).unwrap_or_default(), "Generated constant");
    }

    let store = Store::from_module(&counter);
    let mut applied = store.subscribe();

    let increment = counter.action("increment").context("increment action missing")?;
    let decrement = counter.action("decrement").context("decrement action missing")?;
    let increment_by = counter.action("incrementBy").context("incrementBy action missing")?;

    println!("\n>>> Sending: increment x2");
    store.send_empty(increment).await?;
    store.send_empty(increment).await?;
    let count = store.state(|s| s.count).await;
    println!("Count after increments: {count}");

    println!("\n>>> Sending: incrementBy(10)");
    store.send(increment_by, 10).await?;
    let count = store.state(|s| s.count).await;
    println!("Count after incrementBy: {count}");

    println!("\n>>> Sending: decrement");
    store.send_empty(decrement).await?;
    let state = store.state(Clone::clone).await;
    println!("Count after decrement: {} (high water {})", state.count, state.high_water);

    println!("\n>>> Dispatching: {RESET}");
    store.dispatch(Action::new(RESET)).await?;
    let state = store.state(Clone::clone).await;
    println!("State after reset: {state:?}");

    while let Ok(action) = applied.try_recv() {
        tracing::info!(action_type = %action.action_type, error = action.error, "Applied action");
    }

    store.shutdown();
    tracing::info!("Store shut down");
    Ok(())
}
