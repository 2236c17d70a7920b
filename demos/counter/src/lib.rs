//! # Counter Example
//!
//! A simple counter built with the Ducks module factory.
//!
//! This example showcases:
//! - Function-form transformations (`increment`, `decrement`, `incrementBy`)
//! - An object-form transformation with an explicit, global type (`reset`)
//! - A composed reducer that runs after every action (high-water mark)
//! - Module-wide middleware (action metadata)
//! - Store usage
//!
//! ## Example
//!
//! ```no_run
//! use counter::counter_module;
//! use ducks_runtime::Store;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let counter = counter_module()?;
//! let store = Store::from_module(&counter);
//!
//! if let Some(increment) = counter.action("increment") {
//!     store.send_empty(increment).await?;
//! }
//! let count = store.state(|s| s.count).await;
//! assert_eq!(count, 1);
//! # Ok(())
//! # }
//! ```

use ducks_core::{middleware, Action, Module, ModuleError, ModuleSpec, TransformationSpec};

/// Module name and namespace prefix
pub const MODULE_NAME: &str = "counter";

/// Global reset type, shared by every module that wants to reset with the app
pub const RESET: &str = "@@app/RESET";

/// Counter state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterState {
    /// Current count value
    pub count: i64,
    /// Highest count seen since the last reset
    pub high_water: i64,
}

/// Counter module type
pub type CounterModule = Module<CounterState, i64>;

fn increment(state: CounterState, _action: &Action<i64>) -> CounterState {
    CounterState {
        count: state.count.saturating_add(1),
        ..state
    }
}

fn decrement(state: CounterState, _action: &Action<i64>) -> CounterState {
    CounterState {
        count: state.count.saturating_sub(1),
        ..state
    }
}

fn increment_by(state: CounterState, action: &Action<i64>) -> CounterState {
    let amount = action.value().copied().unwrap_or(0);
    CounterState {
        count: state.count.saturating_add(amount),
        ..state
    }
}

fn track_high_water(state: CounterState, _action: &Action<i64>) -> CounterState {
    CounterState {
        high_water: state.high_water.max(state.count),
        ..state
    }
}

/// Build the counter module
///
/// # Errors
///
/// Returns [`ModuleError`] if the module spec is invalid.
pub fn counter_module() -> Result<CounterModule, ModuleError> {
    ModuleSpec::new(MODULE_NAME, CounterState::default())
        .with_middleware(middleware(|action: Action<i64>| {
            action.with_meta(serde_json::json!({ "module": MODULE_NAME }))
        }))
        .with_reducer("increment", increment)
        .with_reducer("decrement", decrement)
        .with_reducer("incrementBy", increment_by)
        .with_transformation(
            "reset",
            TransformationSpec::new()
                .with_type(RESET)
                .namespaced(false)
                .with_reducer(|_state: CounterState, _action: &Action<i64>| CounterState::default()),
        )
        .with_composed(track_high_water)
        .build()
}
