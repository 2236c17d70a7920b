//! The module factory
//!
//! [`create_module`] turns a declarative [`ModuleSpec`] into a [`Module`]:
//! one action creator and one type constant per transformation, plus a
//! single reducer that dispatches on the action type.
//!
//! # Type resolution
//!
//! Each transformation resolves to exactly one action type:
//!
//! - an explicit type set with [`TransformationSpec::with_type`] wins;
//! - otherwise the transformation's key is converted to upper snake case
//!   (`addTodo` → `ADD_TODO`);
//! - an unkeyed transformation without an explicit type is rejected with
//!   [`ModuleError::InvalidSpecification`].
//!
//! Namespaced types (the default) are prefixed with the module name:
//! `todos/ADD_TODO`.
//!
//! # Example
//!
//! ```
//! use ducks_core::{create_module, Action, ModuleSpec, TransformationSpec};
//!
//! let todos = create_module(
//!     ModuleSpec::new("todos", Vec::<String>::new())
//!         .with_reducer("addTodo", |mut todos: Vec<String>, action: &Action<String>| {
//!             todos.extend(action.value().cloned());
//!             todos
//!         })
//!         .with_transformation(
//!             "reset",
//!             TransformationSpec::new()
//!                 .with_type("@@app/RESET")
//!                 .namespaced(false)
//!                 .with_reducer(|_todos: Vec<String>, _action: &Action<String>| Vec::new()),
//!         ),
//! )?;
//!
//! assert_eq!(todos.constant("addTodo"), Some("todos/ADD_TODO"));
//! assert_eq!(todos.constant("reset"), Some("@@app/RESET"));
//!
//! let add = todos.action("addTodo").map(|creator| creator.create("write docs".to_string()));
//! let state = add.iter().fold(Vec::new(), |state, action| todos.reduce(state, action));
//! assert_eq!(state, vec!["write docs".to_string()]);
//! # Ok::<(), ducks_core::ModuleError>(())
//! ```

use crate::action::{create_action, parse_payload_errors, Action, ActionCreator, Middleware};
use crate::composition::CombinedReducer;
use crate::reducer::{from_fn, BoxedReducer, Reducer, ReducerEnhancer};
use heck::ToShoutySnakeCase;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while building a module
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModuleError {
    /// A transformation has no key and no explicit type, so no action type
    /// can be determined for it.
    #[error("transformation #{index} has neither an action name nor an explicit `type`")]
    InvalidSpecification {
        /// Position of the offending transformation in the module spec
        index: usize,
    },
}

/// Convert an action name to its action type (`fetchUser` → `FETCH_USER`)
///
/// Digit runs are words of their own: `fetchV2` → `FETCH_V_2`,
/// `step2Done` → `STEP_2_DONE`.
#[must_use]
pub fn format_type(action_name: &str) -> String {
    let shouty = action_name.to_shouty_snake_case();
    let mut formatted = String::with_capacity(shouty.len() + 4);
    let mut previous: Option<char> = None;

    for c in shouty.chars() {
        if let Some(prev) = previous {
            let letter_digit = prev.is_alphabetic() && c.is_ascii_digit();
            let digit_letter = prev.is_ascii_digit() && c.is_alphabetic();
            if letter_digit || digit_letter {
                formatted.push('_');
            }
        }
        formatted.push(c);
        previous = Some(c);
    }

    formatted
}

/// Object-form transformation with per-field defaults.
///
/// | field         | default                                   |
/// |---------------|-------------------------------------------|
/// | `action_name` | the key it is registered under            |
/// | `action_type` | upper snake case of the key               |
/// | `reducer`     | none: matching actions leave state as is  |
/// | `middleware`  | empty                                     |
/// | `namespaced`  | `true`                                    |
pub struct TransformationSpec<S, P> {
    /// Name of the generated action creator and constant
    pub action_name: Option<String>,
    /// Explicit action type, before namespacing
    pub action_type: Option<String>,
    /// Reducer bound to the resolved type
    pub reducer: Option<BoxedReducer<S, P>>,
    /// Middleware run by this transformation's action creator only
    pub middleware: Vec<Middleware<P>>,
    /// Prefix the type with the module name
    pub namespaced: bool,
}

impl<S, P> TransformationSpec<S, P> {
    /// Create a transformation with every field at its default
    #[must_use]
    pub const fn new() -> Self {
        Self {
            action_name: None,
            action_type: None,
            reducer: None,
            middleware: Vec::new(),
            namespaced: true,
        }
    }

    /// Set the reducer
    #[must_use]
    pub fn with_reducer<F>(mut self, reducer: F) -> Self
    where
        F: Fn(S, &Action<P>) -> S + Send + Sync + 'static,
    {
        self.reducer = Some(from_fn(reducer));
        self
    }

    /// Set an already boxed reducer
    #[must_use]
    pub fn with_boxed_reducer(mut self, reducer: BoxedReducer<S, P>) -> Self {
        self.reducer = Some(reducer);
        self
    }

    /// Set an explicit action type
    #[must_use]
    pub fn with_type(mut self, action_type: impl Into<String>) -> Self {
        self.action_type = Some(action_type.into());
        self
    }

    /// Set the action name, overriding the key
    #[must_use]
    pub fn with_action_name(mut self, action_name: impl Into<String>) -> Self {
        self.action_name = Some(action_name.into());
        self
    }

    /// Append a middleware to this transformation's chain
    #[must_use]
    pub fn with_middleware(mut self, middleware: Middleware<P>) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Choose whether the type is prefixed with the module name
    #[must_use]
    pub fn namespaced(mut self, namespaced: bool) -> Self {
        self.namespaced = namespaced;
        self
    }
}

impl<S, P> Default for TransformationSpec<S, P> {
    fn default() -> Self {
        Self::new()
    }
}

/// One declared state transition
pub enum Transformation<S, P> {
    /// Just a reducer; everything else is derived from the key
    Reducer(BoxedReducer<S, P>),
    /// Object form with explicit settings
    Spec(TransformationSpec<S, P>),
}

impl<S: 'static, P: 'static> Transformation<S, P> {
    /// Function-form transformation from a closure
    pub fn from_fn<F>(reducer: F) -> Self
    where
        F: Fn(S, &Action<P>) -> S + Send + Sync + 'static,
    {
        Self::Reducer(from_fn(reducer))
    }
}

impl<S, P> From<TransformationSpec<S, P>> for Transformation<S, P> {
    fn from(spec: TransformationSpec<S, P>) -> Self {
        Self::Spec(spec)
    }
}

/// Entry in the ordered transformation table.
///
/// Keyed entries come from the mapping form, unkeyed ones from the sequence
/// form.
struct TransformationEntry<S, P> {
    key: Option<String>,
    transformation: Transformation<S, P>,
}

/// Declarative description of a module.
///
/// | field             | default          |
/// |-------------------|------------------|
/// | `transformations` | empty            |
/// | `composes`        | empty            |
/// | `middleware`      | empty            |
/// | `reducer_enhancer`| none (identity)  |
/// | `selector`        | `()`             |
pub struct ModuleSpec<S, P, Sel = ()> {
    name: String,
    initial_state: S,
    transformations: Vec<TransformationEntry<S, P>>,
    composes: Vec<BoxedReducer<S, P>>,
    middleware: Vec<Middleware<P>>,
    reducer_enhancer: Option<ReducerEnhancer<S, P>>,
    selector: Sel,
}

impl<S: 'static, P: 'static> ModuleSpec<S, P> {
    /// Start a module spec with a name and initial state
    #[must_use]
    pub fn new(name: impl Into<String>, initial_state: S) -> Self {
        Self {
            name: name.into(),
            initial_state,
            transformations: Vec::new(),
            composes: Vec::new(),
            middleware: Vec::new(),
            reducer_enhancer: None,
            selector: (),
        }
    }
}

impl<S: 'static, P: 'static, Sel> ModuleSpec<S, P, Sel> {
    /// Add a function-form transformation under `action_name`
    #[must_use]
    pub fn with_reducer<F>(self, action_name: impl Into<String>, reducer: F) -> Self
    where
        F: Fn(S, &Action<P>) -> S + Send + Sync + 'static,
    {
        self.with_entry(Some(action_name.into()), Transformation::from_fn(reducer))
    }

    /// Add an object-form transformation under `action_name`
    #[must_use]
    pub fn with_transformation(self, action_name: impl Into<String>, spec: TransformationSpec<S, P>) -> Self {
        self.with_entry(Some(action_name.into()), Transformation::Spec(spec))
    }

    /// Add an unkeyed (sequence-form) transformation.
    ///
    /// It must carry an explicit type, or [`create_module`] fails. Its action
    /// creator and constant are stored under
    /// [`TransformationSpec::with_action_name`] when set, otherwise under the
    /// explicit type as given, before namespacing (`CLEAR`, not `list/CLEAR`).
    #[must_use]
    pub fn with_unkeyed(self, transformation: impl Into<Transformation<S, P>>) -> Self {
        self.with_entry(None, transformation.into())
    }

    /// Add a transformation with an optional key
    #[must_use]
    pub fn with_entry(mut self, key: Option<String>, transformation: Transformation<S, P>) -> Self {
        self.transformations.push(TransformationEntry { key, transformation });
        self
    }

    /// Add a reducer run after the transformation reducer, for every action
    #[must_use]
    pub fn with_composed<F>(mut self, reducer: F) -> Self
    where
        F: Fn(S, &Action<P>) -> S + Send + Sync + 'static,
    {
        self.composes.push(from_fn(reducer));
        self
    }

    /// Add an already boxed composed reducer
    #[must_use]
    pub fn with_boxed_composed(mut self, reducer: BoxedReducer<S, P>) -> Self {
        self.composes.push(reducer);
        self
    }

    /// Append a middleware run by every action creator of the module
    #[must_use]
    pub fn with_middleware(mut self, middleware: Middleware<P>) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Wrap the final reducer
    #[must_use]
    pub fn with_reducer_enhancer<F>(mut self, enhancer: F) -> Self
    where
        F: FnOnce(BoxedReducer<S, P>) -> BoxedReducer<S, P> + Send + 'static,
    {
        self.reducer_enhancer = Some(Box::new(enhancer));
        self
    }

    /// Attach an opaque selector, passed through to the module unchanged
    #[must_use]
    pub fn with_selector<T>(self, selector: T) -> ModuleSpec<S, P, T> {
        ModuleSpec {
            name: self.name,
            initial_state: self.initial_state,
            transformations: self.transformations,
            composes: self.composes,
            middleware: self.middleware,
            reducer_enhancer: self.reducer_enhancer,
            selector,
        }
    }

    /// Build the module, see [`create_module`]
    ///
    /// # Errors
    ///
    /// Returns [`ModuleError::InvalidSpecification`] if a transformation's
    /// action type cannot be determined.
    pub fn build(self) -> Result<Module<S, P, Sel>, ModuleError> {
        create_module(self)
    }
}

/// A built module: action creators, type constants and one reducer.
pub struct Module<S, P, Sel = ()> {
    /// Module name, used as the namespace prefix
    pub name: String,
    /// State the module starts from
    pub initial_state: S,
    /// Action creators keyed by action name
    pub actions: HashMap<String, ActionCreator<P>>,
    /// Resolved action types keyed by action name
    pub constants: HashMap<String, String>,
    /// Final reducer
    pub reducer: BoxedReducer<S, P>,
    /// Selector passed through from the spec
    pub selector: Sel,
    /// Action names in declaration order
    declared: Vec<String>,
}

impl<S, P, Sel> Module<S, P, Sel> {
    /// Action creator registered under `action_name`
    #[must_use]
    pub fn action(&self, action_name: &str) -> Option<&ActionCreator<P>> {
        self.actions.get(action_name)
    }

    /// Resolved action type registered under `action_name`
    #[must_use]
    pub fn constant(&self, action_name: &str) -> Option<&str> {
        self.constants.get(action_name).map(String::as_str)
    }

    /// All action names, in the order their transformations were declared
    #[must_use]
    pub fn action_names(&self) -> Vec<&str> {
        self.declared.iter().map(String::as_str).collect()
    }

    /// Apply the module reducer
    pub fn reduce(&self, state: S, action: &Action<P>) -> S {
        self.reducer.reduce(state, action)
    }
}

impl<S: fmt::Debug, P, Sel> fmt::Debug for Module<S, P, Sel> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("initial_state", &self.initial_state)
            .field("constants", &self.constants)
            .finish_non_exhaustive()
    }
}

/// Uniform record every transformation resolves into
struct ResolvedTransformation<S, P> {
    action_name: String,
    constant: String,
    reducer: Option<BoxedReducer<S, P>>,
    middleware: Vec<Middleware<P>>,
}

fn resolve<S: 'static, P: 'static>(
    module_name: &str,
    index: usize,
    entry: TransformationEntry<S, P>,
) -> Result<ResolvedTransformation<S, P>, ModuleError> {
    let TransformationEntry { key, transformation } = entry;

    let spec = match transformation {
        Transformation::Reducer(reducer) => TransformationSpec::new().with_boxed_reducer(reducer),
        Transformation::Spec(spec) => spec,
    };

    let action_type = match (spec.action_type, key.as_deref()) {
        (Some(action_type), _) => action_type,
        (None, Some(key)) => format_type(key),
        (None, None) => return Err(ModuleError::InvalidSpecification { index }),
    };

    let constant = if spec.namespaced {
        format!("{module_name}/{action_type}")
    } else {
        action_type.clone()
    };

    // Unkeyed entries fall back to their raw type as the action name.
    let action_name = spec.action_name.or(key).unwrap_or(action_type);

    Ok(ResolvedTransformation {
        action_name,
        constant,
        reducer: spec.reducer,
        middleware: spec.middleware,
    })
}

/// Reducer produced by the factory before enhancement
struct ModuleReducer<S, P> {
    bindings: HashMap<String, Option<BoxedReducer<S, P>>>,
    composes: CombinedReducer<S, P>,
}

impl<S, P> Reducer<S, P> for ModuleReducer<S, P> {
    fn reduce(&self, state: S, action: &Action<P>) -> S {
        let state = match self.bindings.get(&action.action_type) {
            Some(Some(reducer)) => reducer.reduce(state, action),
            _ => state,
        };
        self.composes.reduce(state, action)
    }
}

/// Build a module from its spec.
///
/// Every transformation yields an action creator whose middleware chain is
/// `parse_payload_errors`, then the transformation's middleware, then the
/// module's middleware. Later transformations resolving to an already bound
/// type replace the earlier reducer binding; both action creators are kept.
///
/// # Errors
///
/// Returns [`ModuleError::InvalidSpecification`] if an unkeyed transformation
/// has no explicit type.
pub fn create_module<S, P, Sel>(spec: ModuleSpec<S, P, Sel>) -> Result<Module<S, P, Sel>, ModuleError>
where
    S: 'static,
    P: 'static,
{
    let ModuleSpec {
        name,
        initial_state,
        transformations,
        composes,
        middleware: module_middleware,
        reducer_enhancer,
        selector,
    } = spec;

    tracing::debug!(
        module = %name,
        transformations = transformations.len(),
        composes = composes.len(),
        "Building module"
    );

    let resolved = transformations
        .into_iter()
        .enumerate()
        .map(|(index, entry)| resolve(&name, index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    let mut actions = HashMap::with_capacity(resolved.len());
    let mut constants = HashMap::with_capacity(resolved.len());
    let mut bindings = HashMap::with_capacity(resolved.len());
    let mut declared = Vec::with_capacity(resolved.len());

    for transformation in resolved {
        let ResolvedTransformation {
            action_name,
            constant,
            reducer,
            middleware,
        } = transformation;

        let chain = std::iter::once(parse_payload_errors())
            .chain(middleware)
            .chain(module_middleware.iter().map(Arc::clone));

        tracing::trace!(module = %name, action = %action_name, constant = %constant, "Bound transformation");

        if actions.insert(action_name.clone(), create_action(constant.clone(), chain)).is_none() {
            declared.push(action_name.clone());
        }
        constants.insert(action_name, constant.clone());

        if bindings.insert(constant.clone(), reducer).is_some() {
            tracing::warn!(module = %name, constant = %constant, "Action type bound twice, keeping the later reducer");
        }
    }

    let composed: BoxedReducer<S, P> = Arc::new(ModuleReducer {
        bindings,
        composes: CombinedReducer::new(composes),
    });

    let reducer = match reducer_enhancer {
        Some(enhance) => enhance(composed),
        None => composed,
    };

    Ok(Module {
        name,
        initial_state,
        actions,
        constants,
        reducer,
        selector,
        declared,
    })
}
