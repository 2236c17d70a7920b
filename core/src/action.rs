//! Actions, payloads and action creators
//!
//! Actions follow the flux-standard-action layout: a `type` string, an
//! optional payload, an `error` flag and optional free-form `meta`.
//!
//! Action creators are built with [`create_action`] from a type constant and
//! an ordered middleware chain. Calling a creator builds the raw action and
//! folds it through every middleware in order.
//!
//! # Example
//!
//! ```
//! use ducks_core::action::{create_action, middleware, parse_payload_errors, Action};
//!
//! let stamp = middleware(|action: Action<u32>| {
//!     action.with_meta(serde_json::json!({ "source": "example" }))
//! });
//!
//! let increment_by = create_action("COUNTER/INCREMENT_BY", [parse_payload_errors(), stamp]);
//! let action = increment_by.create(5);
//!
//! assert_eq!(action.action_type, "COUNTER/INCREMENT_BY");
//! assert_eq!(action.value(), Some(&5));
//! assert!(!action.error);
//! assert!(action.meta.is_some());
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error value carried inside an action payload.
///
/// Failed operations are reported by dispatching an action whose payload is
/// an error; [`parse_payload_errors`] then raises the action's `error` flag.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct PayloadError {
    /// Human readable description of the failure
    pub message: String,
}

impl PayloadError {
    /// Create a payload error with the given message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Capture any error's display output as a payload error
    #[must_use]
    pub fn from_error(error: &dyn std::error::Error) -> Self {
        Self::new(error.to_string())
    }
}

/// Payload of an action: either a regular value or an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload<P> {
    /// Regular payload value
    Value(P),
    /// The action reports a failure
    Error(PayloadError),
}

impl<P> Payload<P> {
    /// Returns `true` if this payload carries an error
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// A record describing an intent to change state.
///
/// Serializes with the wire field name `type` for the action type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action<P> {
    /// Resolved action type, e.g. `COUNTER/INCREMENT`
    #[serde(rename = "type")]
    pub action_type: String,

    /// Optional payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload<P>>,

    /// Set when the payload is an error
    #[serde(default)]
    pub error: bool,

    /// Free-form metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl<P> Action<P> {
    /// Create an action with the given type and no payload
    #[must_use]
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            payload: None,
            error: false,
            meta: None,
        }
    }

    /// Attach a value payload
    #[must_use]
    pub fn with_payload(mut self, value: P) -> Self {
        self.payload = Some(Payload::Value(value));
        self
    }

    /// Attach an error payload
    ///
    /// The `error` flag is left untouched; it is raised by
    /// [`parse_payload_errors`] when the action passes through a creator.
    #[must_use]
    pub fn with_error(mut self, error: PayloadError) -> Self {
        self.payload = Some(Payload::Error(error));
        self
    }

    /// Attach metadata
    #[must_use]
    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }

    /// The payload value, if the payload is a regular value
    #[must_use]
    pub const fn value(&self) -> Option<&P> {
        match &self.payload {
            Some(Payload::Value(value)) => Some(value),
            _ => None,
        }
    }

    /// The payload error, if the payload is an error
    #[must_use]
    pub const fn payload_error(&self) -> Option<&PayloadError> {
        match &self.payload {
            Some(Payload::Error(error)) => Some(error),
            _ => None,
        }
    }

    /// Returns `true` if this action's type equals `action_type`
    #[must_use]
    pub fn is(&self, action_type: &str) -> bool {
        self.action_type == action_type
    }
}

/// Action-processing function run inside an action creator.
///
/// Not to be confused with store-level middleware: these only transform the
/// action a creator produces.
pub type Middleware<P> = Arc<dyn Fn(Action<P>) -> Action<P> + Send + Sync>;

/// Wrap a closure as a [`Middleware`]
pub fn middleware<P, F>(f: F) -> Middleware<P>
where
    F: Fn(Action<P>) -> Action<P> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Raise the `error` flag when the payload is an error, clear it otherwise.
///
/// Every creator built by the module factory runs this first.
#[must_use]
pub fn parse_payload_errors<P: 'static>() -> Middleware<P> {
    middleware(|mut action: Action<P>| {
        action.error = action.payload.as_ref().is_some_and(Payload::is_error);
        action
    })
}

/// Builds actions of a single type and runs them through a middleware chain.
pub struct ActionCreator<P> {
    action_type: String,
    middleware: SmallVec<[Middleware<P>; 4]>,
}

impl<P> ActionCreator<P> {
    /// The type constant every action from this creator carries
    #[must_use]
    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    /// Number of middleware in the chain
    #[must_use]
    pub fn middleware_len(&self) -> usize {
        self.middleware.len()
    }

    /// Build an action from an optional payload and metadata.
    ///
    /// The raw action has `error: false`; middleware then run in order, each
    /// receiving the previous one's output.
    #[must_use]
    pub fn build(&self, payload: Option<Payload<P>>, meta: Option<serde_json::Value>) -> Action<P> {
        let action = Action {
            action_type: self.action_type.clone(),
            payload,
            error: false,
            meta,
        };

        self.middleware
            .iter()
            .fold(action, |action, middleware| middleware(action))
    }

    /// Build an action carrying `value`
    #[must_use]
    pub fn create(&self, value: P) -> Action<P> {
        self.build(Some(Payload::Value(value)), None)
    }

    /// Build an action carrying `value` and `meta`
    #[must_use]
    pub fn create_with_meta(&self, value: P, meta: serde_json::Value) -> Action<P> {
        self.build(Some(Payload::Value(value)), Some(meta))
    }

    /// Build an action without a payload
    #[must_use]
    pub fn create_empty(&self) -> Action<P> {
        self.build(None, None)
    }

    /// Build an action reporting a failure
    #[must_use]
    pub fn fail(&self, error: impl Into<PayloadError>) -> Action<P> {
        self.build(Some(Payload::Error(error.into())), None)
    }
}

impl<P> Clone for ActionCreator<P> {
    fn clone(&self) -> Self {
        Self {
            action_type: self.action_type.clone(),
            middleware: self.middleware.clone(),
        }
    }
}

impl<P> fmt::Debug for ActionCreator<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionCreator")
            .field("action_type", &self.action_type)
            .field("middleware", &self.middleware.len())
            .finish()
    }
}

impl From<&str> for PayloadError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for PayloadError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Create an action creator for `action_type` with an ordered middleware chain.
pub fn create_action<P>(
    action_type: impl Into<String>,
    middleware: impl IntoIterator<Item = Middleware<P>>,
) -> ActionCreator<P> {
    ActionCreator {
        action_type: action_type.into(),
        middleware: middleware.into_iter().collect(),
    }
}
