//! # Ducks Core
//!
//! Core types for building self-contained state modules ("ducks") for a
//! unidirectional-data-flow state container.
//!
//! A module bundles everything one slice of state needs: its action type
//! constants, the action creators that build those actions and the reducer
//! that applies them. Instead of writing all three by hand, you describe the
//! transformations once and let [`create_module`] derive the rest.
//!
//! ## Core Concepts
//!
//! - **Action**: A record with a `type` string, an optional payload and metadata
//! - **Action creator**: Builds actions of one type through a middleware chain
//! - **Reducer**: Pure function `(State, Action) → State`
//! - **Module**: Named bundle of actions, constants and one reducer
//!
//! ## Example
//!
//! ```
//! use ducks_core::{create_module, Action, ModuleSpec};
//!
//! let counter = create_module(
//!     ModuleSpec::new("counter", 0_i64)
//!         .with_reducer("increment", |state: i64, _action: &Action<()>| state + 1)
//!         .with_reducer("decrement", |state: i64, _action: &Action<()>| state - 1),
//! )?;
//!
//! assert_eq!(counter.constant("increment"), Some("counter/INCREMENT"));
//!
//! let increment = counter.action("increment").map(|creator| creator.create_empty());
//! let state = increment.iter().fold(counter.initial_state, |state, action| {
//!     counter.reduce(state, action)
//! });
//! assert_eq!(state, 1);
//! # Ok::<(), ducks_core::ModuleError>(())
//! ```

pub use serde::{Deserialize, Serialize};

/// Actions, payloads, middleware and action creators
pub mod action;

/// Reducer composition utilities
pub mod composition;

/// The module factory
pub mod module;

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(State, Action) → State`.
///
/// Any `Fn(S, &Action<P>) -> S + Send + Sync` closure is a reducer, so most
/// code never implements the trait by hand.
pub mod reducer {
    use crate::action::Action;
    use std::sync::Arc;

    /// The Reducer trait - computes the next state from the current state and an action
    ///
    /// # Type Parameters
    ///
    /// - `S`: The state this reducer operates on
    /// - `P`: The payload type of the actions it processes
    ///
    /// # Example
    ///
    /// ```
    /// use ducks_core::{Action, Reducer};
    ///
    /// struct Clamp {
    ///     max: i64,
    /// }
    ///
    /// impl Reducer<i64, ()> for Clamp {
    ///     fn reduce(&self, state: i64, _action: &Action<()>) -> i64 {
    ///         state.min(self.max)
    ///     }
    /// }
    ///
    /// assert_eq!(Clamp { max: 10 }.reduce(42, &Action::new("ANY")), 10);
    /// ```
    pub trait Reducer<S, P>: Send + Sync {
        /// Compute the next state
        fn reduce(&self, state: S, action: &Action<P>) -> S;
    }

    impl<S, P, F> Reducer<S, P> for F
    where
        F: Fn(S, &Action<P>) -> S + Send + Sync,
    {
        fn reduce(&self, state: S, action: &Action<P>) -> S {
            self(state, action)
        }
    }

    /// Shared, type-erased reducer
    pub type BoxedReducer<S, P> = Arc<dyn Reducer<S, P>>;

    /// Wraps a finished reducer into a new one (undo history, logging, resets, ...)
    pub type ReducerEnhancer<S, P> = Box<dyn FnOnce(BoxedReducer<S, P>) -> BoxedReducer<S, P> + Send>;

    /// Erase a reducer's concrete type
    pub fn boxed<S, P, R>(reducer: R) -> BoxedReducer<S, P>
    where
        R: Reducer<S, P> + 'static,
    {
        Arc::new(reducer)
    }

    /// Wrap a closure as a [`BoxedReducer`]
    pub fn from_fn<S, P, F>(f: F) -> BoxedReducer<S, P>
    where
        F: Fn(S, &Action<P>) -> S + Send + Sync + 'static,
    {
        Arc::new(f)
    }

    /// Reducer that returns the state unchanged
    #[must_use]
    pub fn identity<S: 'static, P: 'static>() -> BoxedReducer<S, P> {
        from_fn(|state: S, _action: &Action<P>| state)
    }
}

// Re-export commonly used types
pub use action::{
    create_action, middleware, parse_payload_errors, Action, ActionCreator, Middleware, Payload,
    PayloadError,
};
pub use composition::{combine_reducers, scope_reducer};
pub use module::{
    create_module, format_type, Module, ModuleError, ModuleSpec, Transformation, TransformationSpec,
};
pub use reducer::{BoxedReducer, Reducer, ReducerEnhancer};

#[cfg(test)]
mod tests {
    use super::reducer::{boxed, from_fn, identity};
    use super::*;

    struct AddN(i32);

    impl Reducer<i32, ()> for AddN {
        fn reduce(&self, state: i32, _action: &Action<()>) -> i32 {
            state + self.0
        }
    }

    #[test]
    fn test_closures_are_reducers() {
        let double = from_fn(|state: i32, _action: &Action<()>| state * 2);
        assert_eq!(double.reduce(4, &Action::new("ANY")), 8);
    }

    #[test]
    fn test_struct_reducer_boxes() {
        let add = boxed(AddN(3));
        assert_eq!(add.reduce(1, &Action::new("ANY")), 4);
    }

    #[test]
    fn test_identity_leaves_state_unchanged() {
        let same = identity::<Vec<u8>, ()>();
        assert_eq!(same.reduce(vec![1, 2], &Action::new("ANY")), vec![1, 2]);
    }
}
