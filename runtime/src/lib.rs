//! # Ducks Runtime
//!
//! Store runtime for Ducks modules.
//!
//! The store owns the current state, applies dispatched actions through a
//! module's reducer and broadcasts every applied action to subscribers.
//!
//! ## Example
//!
//! ```
//! use ducks_core::{Action, ModuleSpec};
//! use ducks_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let counter = ModuleSpec::new("counter", 0_i64)
//!     .with_reducer("incrementBy", |state: i64, action: &Action<i64>| {
//!         state + action.value().copied().unwrap_or(0)
//!     })
//!     .build()?;
//!
//! let store = Store::from_module(&counter);
//! if let Some(increment_by) = counter.action("incrementBy") {
//!     store.send(increment_by, 5).await?;
//! }
//!
//! assert_eq!(store.state(|s| *s).await, 5);
//! # Ok(())
//! # }
//! ```

/// Metric names recorded by the store
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `dispatch()` is called after `shutdown()`.
        #[error("Store is shutting down")]
        ShutdownInProgress,
    }
}

/// Configuration for Store behavior
///
/// # Example
///
/// ```
/// use ducks_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_broadcast_capacity(256);
/// assert_eq!(config.broadcast_capacity, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Buffered actions per subscriber before slow subscribers start lagging
    pub broadcast_capacity: usize,
}

impl StoreConfig {
    /// Default broadcast capacity
    pub const DEFAULT_BROADCAST_CAPACITY: usize = 16;

    /// Set the broadcast capacity (at least 1)
    #[must_use]
    pub fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity.max(1);
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: Self::DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

/// Store module - The runtime for state modules
pub mod store {
    use super::error::StoreError;
    use super::metrics::{ACTIONS_TOTAL, REDUCER_DURATION, REJECTED_ACTIONS};
    use super::StoreConfig;
    use ducks_core::{Action, ActionCreator, BoxedReducer, Module};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::{broadcast, RwLock};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (the module's final reducer)
    /// 3. Action broadcast to subscribers
    ///
    /// Cloning a store is cheap; clones share state and subscribers.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `P`: Action payload type
    pub struct Store<S, P> {
        state: Arc<RwLock<S>>,
        reducer: BoxedReducer<S, P>,
        shutdown: Arc<AtomicBool>,
        /// Every applied action, in the order it was applied
        action_broadcast: broadcast::Sender<Action<P>>,
    }

    impl<S, P> Store<S, P>
    where
        S: Clone + Send + Sync + 'static,
        P: Clone + Send + Sync + 'static,
    {
        /// Create a new store with initial state and reducer
        #[must_use]
        pub fn new(initial_state: S, reducer: BoxedReducer<S, P>) -> Self {
            Self::with_config(initial_state, reducer, StoreConfig::default())
        }

        /// Create a new store with custom configuration
        #[must_use]
        pub fn with_config(initial_state: S, reducer: BoxedReducer<S, P>, config: StoreConfig) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                shutdown: Arc::new(AtomicBool::new(false)),
                action_broadcast,
            }
        }

        /// Create a store running a module's reducer from its initial state
        #[must_use]
        pub fn from_module<Sel>(module: &Module<S, P, Sel>) -> Self {
            tracing::debug!(module = %module.name, "Creating store for module");
            Self::new(module.initial_state.clone(), Arc::clone(&module.reducer))
        }

        /// Apply an action to the state.
        ///
        /// The reducer runs under the write lock; the action is broadcast to
        /// subscribers before the lock is released, so subscribers observe
        /// actions in the order they were applied.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), fields(action_type = %action.action_type), name = "store_dispatch")]
        pub async fn dispatch(&self, action: Action<P>) -> Result<(), StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!(REJECTED_ACTIONS).increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!(ACTIONS_TOTAL).increment(1);

            let mut state = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            let start = std::time::Instant::now();
            let next = self.reducer.reduce((*state).clone(), &action);
            metrics::histogram!(REDUCER_DURATION).record(start.elapsed().as_secs_f64());
            *state = next;

            // No subscribers is not an error
            let _ = self.action_broadcast.send(action);
            tracing::debug!("Action applied");

            Ok(())
        }

        /// Build an action with `creator` and dispatch it
        ///
        /// Returns the dispatched action.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        pub async fn send(&self, creator: &ActionCreator<P>, value: P) -> Result<Action<P>, StoreError> {
            let action = creator.create(value);
            self.dispatch(action.clone()).await?;
            Ok(action)
        }

        /// Build a payload-less action with `creator` and dispatch it
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        pub async fn send_empty(&self, creator: &ActionCreator<P>) -> Result<Action<P>, StoreError> {
            let action = creator.create_empty();
            self.dispatch(action.clone()).await?;
            Ok(action)
        }

        /// Read current state via a closure
        ///
        /// Access state through a closure to ensure the lock is released promptly:
        ///
        /// ```ignore
        /// let todo_count = store.state(|s| s.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Subscribe to applied actions
        ///
        /// The receiver sees every action dispatched after this call.
        #[must_use]
        pub fn subscribe(&self) -> broadcast::Receiver<Action<P>> {
            self.action_broadcast.subscribe()
        }

        /// Stop accepting actions
        ///
        /// Dispatches already holding the state lock complete normally.
        pub fn shutdown(&self) {
            tracing::info!("Store shutting down");
            self.shutdown.store(true, Ordering::Release);
        }

        /// Returns `true` once [`Store::shutdown`] has been called
        #[must_use]
        pub fn is_shutting_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }
    }

    impl<S, P> Clone for Store<S, P> {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                shutdown: Arc::clone(&self.shutdown),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use error::StoreError;
pub use store::Store;
