//! # Ducks Testing
//!
//! Testing utilities and helpers for Ducks state modules.
//!
//! This crate provides:
//! - `ReducerTest`: Given-When-Then helper for module reducers
//! - Assertion helpers for actions
//! - `RecordingMiddleware`: observe which middleware ran, and in what order
//!
//! ## Example
//!
//! ```
//! use ducks_core::{Action, ModuleSpec, TransformationSpec};
//! use ducks_testing::RecordingMiddleware;
//!
//! let recorder = RecordingMiddleware::new();
//!
//! let module = ModuleSpec::<i32, ()>::new("audit", 0)
//!     .with_middleware(recorder.middleware("module"))
//!     .with_transformation(
//!         "touch",
//!         TransformationSpec::new().with_middleware(recorder.middleware("local")),
//!     )
//!     .build()?;
//!
//! let _ = module.action("touch").map(|creator| creator.create_empty());
//! assert_eq!(recorder.tags(), vec!["local", "module"]);
//! # Ok::<(), ducks_core::ModuleError>(())
//! ```

/// Ergonomic reducer testing with Given-When-Then syntax
pub mod reducer_test;

pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations for testing.
pub mod mocks {
    use ducks_core::action::{middleware, Action, Middleware};
    use std::sync::{Arc, Mutex, PoisonError};

    /// One middleware invocation seen by a [`RecordingMiddleware`]
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedCall {
        /// Tag given when the middleware was created
        pub tag: String,
        /// Type of the action it received
        pub action_type: String,
        /// Value of the action's `error` flag when it arrived
        pub error: bool,
    }

    /// Hands out pass-through middleware that log every call into one shared list.
    ///
    /// Clones share the same log.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingMiddleware {
        calls: Arc<Mutex<Vec<RecordedCall>>>,
    }

    impl RecordingMiddleware {
        /// Create a recorder with an empty log
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// A middleware that records `tag` and passes the action through unchanged
        #[must_use]
        pub fn middleware<P: 'static>(&self, tag: impl Into<String>) -> Middleware<P> {
            let calls = Arc::clone(&self.calls);
            let tag = tag.into();

            middleware(move |action: Action<P>| {
                calls
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(RecordedCall {
                        tag: tag.clone(),
                        action_type: action.action_type.clone(),
                        error: action.error,
                    });
                action
            })
        }

        /// Every recorded call, oldest first
        #[must_use]
        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Tags of every recorded call, oldest first
        #[must_use]
        pub fn tags(&self) -> Vec<String> {
            self.calls().into_iter().map(|call| call.tag).collect()
        }

        /// Forget all recorded calls
        pub fn clear(&self) {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clear();
        }
    }
}

/// Test helpers and utilities
pub mod helpers {
    use tracing_subscriber::EnvFilter;

    /// Install a tracing subscriber that writes through the test harness.
    ///
    /// Honours `RUST_LOG`; safe to call from every test.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::init_test_tracing;
pub use mocks::{RecordedCall, RecordingMiddleware};

#[cfg(test)]
mod tests {
    use super::*;
    use ducks_core::{create_action, parse_payload_errors, Action, ModuleSpec};

    #[test]
    fn test_recording_middleware_records_in_order() {
        let recorder = RecordingMiddleware::new();
        let creator = create_action::<u8>(
            "LIGHTS/TOGGLE",
            [recorder.middleware("a"), parse_payload_errors(), recorder.middleware("b")],
        );

        let _ = creator.fail("bulb blown");

        assert_eq!(
            recorder.calls(),
            vec![
                RecordedCall {
                    tag: "a".to_string(),
                    action_type: "LIGHTS/TOGGLE".to_string(),
                    error: false,
                },
                RecordedCall {
                    tag: "b".to_string(),
                    action_type: "LIGHTS/TOGGLE".to_string(),
                    error: true,
                },
            ]
        );

        recorder.clear();
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_module_chain_order() {
        init_test_tracing();
        let recorder = RecordingMiddleware::new();

        let module = ModuleSpec::<u8, ()>::new("lights", 0)
            .with_middleware(recorder.middleware("global"))
            .with_reducer("toggle", |state: u8, _action: &Action<()>| state ^ 1)
            .build();

        let action = module.ok().and_then(|m| m.action("toggle").map(|c| c.create_empty()));

        assert_eq!(action.map(|a| a.action_type), Some("lights/TOGGLE".to_string()));
        assert_eq!(recorder.tags(), vec!["global"]);
    }
}
