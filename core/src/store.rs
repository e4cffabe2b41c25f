//! Stores - leaf reducer units.
//!
//! A store is an initial value plus a table of transition functions keyed by
//! action type. It only ever runs the handler registered for an action's
//! type; every other action leaves its state untouched.

use crate::Reducer;
use crate::action::Action;
use crate::error::HandlerError;
use crate::table::HandlerTable;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A store's transition function
pub type ReduceFn = Arc<dyn Fn(&Value, &Action) -> Result<Value, HandlerError> + Send + Sync>;

/// A leaf reducer unit
///
/// # Example
///
/// ```
/// use composable_flux_core::{Action, Reducer, Store};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let store = Store::new(json!({ "propAA": 0, "propAB": "" }))
///     .on("X_A", |state, _| {
///         let mut next = state.clone();
///         next["propAA"] = json!(123);
///         next
///     });
///
/// let state = store.initial_state();
/// let next = store.reduce(&state, &Action::new("X_A")).unwrap();
/// assert_eq!(*next, json!({ "propAA": 123, "propAB": "" }));
///
/// // Unhandled types hand back the very same state
/// let same = store.reduce(&next, &Action::new("Y_B")).unwrap();
/// assert!(Arc::ptr_eq(&same, &next));
/// ```
#[derive(Clone)]
pub struct Store {
    initial: Arc<Value>,
    handlers: HandlerTable<ReduceFn>,
}

impl Store {
    /// Create a store with an initial value and no handlers
    #[must_use]
    pub fn new(initial: impl Into<Value>) -> Self {
        Self {
            initial: Arc::new(initial.into()),
            handlers: HandlerTable::new(),
        }
    }

    /// Register an infallible handler for `kind`
    #[must_use]
    pub fn on<F>(self, kind: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Value, &Action) -> Value + Send + Sync + 'static,
    {
        self.try_on(kind, move |state, action| Ok(handler(state, action)))
    }

    /// Register a fallible handler for `kind`
    ///
    /// An `Err` aborts the whole dispatch it occurs in.
    #[must_use]
    pub fn try_on<F>(mut self, kind: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Value, &Action) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(kind, Arc::new(handler));
        self
    }

    /// The value this store starts from
    #[must_use]
    pub fn initial(&self) -> &Value {
        &self.initial
    }

    /// Whether this store reacts to `kind`
    #[must_use]
    pub fn handles(&self, kind: &str) -> bool {
        self.handlers.contains(kind)
    }

    /// The action types this store reacts to
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.handlers.kinds()
    }
}

impl Reducer for Store {
    type State = Arc<Value>;
    type Error = HandlerError;

    fn initial_state(&self) -> Self::State {
        Arc::clone(&self.initial)
    }

    fn reduce(&self, state: &Self::State, action: &Action) -> Result<Self::State, Self::Error> {
        match self.handlers.handler_for(action) {
            Some(handler) => handler(state.as_ref(), action).map(Arc::new),
            None => Ok(Arc::clone(state)),
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("initial", &self.initial)
            .field("handlers", &self.handlers)
            .finish()
    }
}
