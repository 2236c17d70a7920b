//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers in various ways:
//! - **`combine_reducers`**: Run multiple reducers in sequence on the same state/action
//! - **`scope_reducer`**: Focus a reducer on a subset of state
//!
//! # Examples
//!
//! ## Mounting two modules in one root state
//!
//! ```
//! use ducks_core::{combine_reducers, create_module, scope_reducer, Action, ModuleSpec, Reducer};
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct AppState {
//!     clicks: u32,
//!     volume: u32,
//! }
//!
//! let clicks = create_module(
//!     ModuleSpec::new("clicks", 0_u32).with_reducer("click", |n: u32, _a: &Action<()>| n + 1),
//! )?;
//! let volume = create_module(
//!     ModuleSpec::new("volume", 0_u32).with_reducer("louder", |n: u32, _a: &Action<()>| n + 10),
//! )?;
//!
//! let root = combine_reducers(vec![
//!     scope_reducer(clicks.reducer.clone(), |s: &AppState| &s.clicks, |s: &mut AppState, v| s.clicks = v),
//!     scope_reducer(volume.reducer.clone(), |s: &AppState| &s.volume, |s: &mut AppState, v| s.volume = v),
//! ]);
//!
//! let state = root.reduce(AppState::default(), &Action::new("volume/LOUDER"));
//! assert_eq!(state, AppState { clicks: 0, volume: 10 });
//! # Ok::<(), ducks_core::ModuleError>(())
//! ```

use crate::action::Action;
use crate::reducer::{BoxedReducer, Reducer};
use std::sync::Arc;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence and receives the state returned by the
/// previous one. An empty combination is the identity.
///
/// # Examples
///
/// ```
/// use ducks_core::{combine_reducers, Action, Reducer};
/// use ducks_core::reducer::from_fn;
///
/// let add_then_double = combine_reducers(vec![
///     from_fn(|s: i32, _a: &Action<()>| s + 1),
///     from_fn(|s: i32, _a: &Action<()>| s * 2),
/// ]);
///
/// assert_eq!(add_then_double.reduce(3, &Action::new("ANY")), 8);
/// ```
#[must_use]
pub fn combine_reducers<S, P>(reducers: Vec<BoxedReducer<S, P>>) -> BoxedReducer<S, P>
where
    S: 'static,
    P: 'static,
{
    Arc::new(CombinedReducer { reducers })
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, P> {
    reducers: Vec<BoxedReducer<S, P>>,
}

impl<S, P> CombinedReducer<S, P> {
    /// Create a combination from reducers in run order
    #[must_use]
    pub const fn new(reducers: Vec<BoxedReducer<S, P>>) -> Self {
        Self { reducers }
    }

    /// Number of reducers in the combination
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Returns `true` if the combination is the identity
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, P> Reducer<S, P> for CombinedReducer<S, P> {
    fn reduce(&self, state: S, action: &Action<P>) -> S {
        self.reducers
            .iter()
            .fold(state, |state, reducer| reducer.reduce(state, action))
    }
}

/// Scopes a reducer to operate on a subset of a larger state.
///
/// This allows a module's reducer, written against its own state slice, to
/// run inside an application-wide root state.
///
/// # Type Parameters
///
/// - `S`: The parent state type
/// - `Sub`: The child state type (subset of `S`)
/// - `P`: The payload type shared by parent and child actions
#[must_use]
pub fn scope_reducer<S, Sub, P>(
    reducer: BoxedReducer<Sub, P>,
    get_state: fn(&S) -> &Sub,
    set_state: fn(&mut S, Sub),
) -> BoxedReducer<S, P>
where
    S: 'static,
    Sub: Clone + 'static,
    P: 'static,
{
    Arc::new(ScopedReducer {
        reducer,
        get_state,
        set_state,
    })
}

/// A scoped reducer that operates on a subset of state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, Sub, P> {
    reducer: BoxedReducer<Sub, P>,
    get_state: fn(&S) -> &Sub,
    set_state: fn(&mut S, Sub),
}

impl<S, Sub, P> Reducer<S, P> for ScopedReducer<S, Sub, P>
where
    Sub: Clone,
{
    fn reduce(&self, mut state: S, action: &Action<P>) -> S {
        let sub_state = (self.get_state)(&state).clone();
        let sub_state = self.reducer.reduce(sub_state, action);
        (self.set_state)(&mut state, sub_state);
        state
    }
}
