//! Ergonomic testing utilities for reducers
//!
//! This module provides a fluent API for testing reducers with readable Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use ducks_core::{Action, BoxedReducer, Module, Reducer};

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// # Example
///
/// ```
/// use ducks_core::{Action, ModuleSpec};
/// use ducks_testing::ReducerTest;
///
/// let counter = ModuleSpec::new("counter", 0_i64)
///     .with_reducer("increment", |state: i64, _action: &Action<()>| state + 1)
///     .build()?;
///
/// ReducerTest::for_module(&counter)
///     .when_action(Action::new("counter/INCREMENT"))
///     .when_action(Action::new("counter/INCREMENT"))
///     .then_state(|state| {
///         assert_eq!(*state, 2);
///     })
///     .run();
/// # Ok::<(), ducks_core::ModuleError>(())
/// ```
pub struct ReducerTest<S, P> {
    reducer: BoxedReducer<S, P>,
    initial_state: Option<S>,
    actions: Vec<Action<P>>,
    state_assertions: Vec<StateAssertion<S>>,
}

impl<S, P> ReducerTest<S, P> {
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: BoxedReducer<S, P>) -> Self {
        Self {
            reducer,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
        }
    }

    /// Test a module's reducer, starting from its initial state
    #[must_use]
    pub fn for_module<Sel>(module: &Module<S, P, Sel>) -> Self
    where
        S: Clone,
    {
        Self::new(module.reducer.clone()).given_state(module.initial_state.clone())
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Queue an action to apply (When); actions run in the order given
    #[must_use]
    pub fn when_action(mut self, action: Action<P>) -> Self {
        self.actions.push(action);
        self
    }

    /// Queue several actions (When)
    #[must_use]
    pub fn when_actions(mut self, actions: impl IntoIterator<Item = Action<P>>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if the initial state is not set, or if any assertion fails.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        let state = self
            .actions
            .iter()
            .fold(state, |state, action| self.reducer.reduce(state, action));

        for assertion in self.state_assertions {
            assertion(&state);
        }
    }
}

/// Helper assertions for actions
pub mod assertions {
    use ducks_core::Action;

    /// Assert the action's type
    ///
    /// # Panics
    ///
    /// Panics if the type differs.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_action_type<P>(action: &Action<P>, expected: &str) {
        assert_eq!(
            action.action_type, expected,
            "Expected action type {expected}, but found {}",
            action.action_type
        );
    }

    /// Assert that the action is flagged as an error
    ///
    /// # Panics
    ///
    /// Panics if the `error` flag is not set or the payload is not an error.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_error_action<P>(action: &Action<P>) {
        assert!(action.error, "Expected {} to be flagged as an error", action.action_type);
        assert!(
            action.payload_error().is_some(),
            "Expected {} to carry an error payload",
            action.action_type
        );
    }

    /// Assert the action's payload value
    ///
    /// # Panics
    ///
    /// Panics if the payload is missing, is an error, or differs.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_payload<P: PartialEq + std::fmt::Debug>(action: &Action<P>, expected: &P) {
        assert_eq!(action.value(), Some(expected), "Unexpected payload on {}", action.action_type);
    }

    /// Assert the action's metadata
    ///
    /// # Panics
    ///
    /// Panics if the metadata is missing or differs.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_meta<P>(action: &Action<P>, expected: &serde_json::Value) {
        assert_eq!(action.meta.as_ref(), Some(expected), "Unexpected meta on {}", action.action_type);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ducks_core::reducer::from_fn;
    use ducks_core::{create_action, parse_payload_errors};

    fn test_reducer() -> BoxedReducer<i32, i32> {
        from_fn(|state: i32, action: &Action<i32>| match action.action_type.as_str() {
            "INCREMENT" => state + 1,
            "DECREMENT" => state - 1,
            "ADD" => state + action.value().copied().unwrap_or(0),
            _ => state,
        })
    }

    #[test]
    fn test_reducer_test_increment() {
        ReducerTest::new(test_reducer())
            .given_state(0)
            .when_action(Action::new("INCREMENT"))
            .then_state(|state| {
                assert_eq!(*state, 1);
            })
            .run();
    }

    #[test]
    fn test_reducer_test_sequence() {
        ReducerTest::new(test_reducer())
            .given_state(5)
            .when_actions([
                Action::new("DECREMENT"),
                Action::new("ADD").with_payload(10),
                Action::new("UNKNOWN"),
            ])
            .then_state(|state| {
                assert_eq!(*state, 14);
            })
            .run();
    }

    #[test]
    fn test_assertions() {
        let creator = create_action::<i32>("MATH/ADD", [parse_payload_errors()]);

        let ok = creator.create_with_meta(2, serde_json::json!({ "origin": "test" }));
        assertions::assert_action_type(&ok, "MATH/ADD");
        assertions::assert_payload(&ok, &2);
        assertions::assert_meta(&ok, &serde_json::json!({ "origin": "test" }));

        assertions::assert_error_action(&creator.fail("overflow"));
    }

    #[test]
    #[should_panic(expected = "Expected action type")]
    fn test_assert_action_type_mismatch() {
        assertions::assert_action_type(&Action::<()>::new("A"), "B");
    }
}
