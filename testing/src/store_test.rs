//! Ergonomic testing utilities for stores
//!
//! This module provides a fluent API for testing a single store with readable
//! Given-When-Then syntax, plus assertion helpers for a flux's history and
//! state.

#![allow(clippy::module_name_repetitions)] // StoreTest is the natural name

use composable_flux_core::{Action, HandlerError, Reducer, Store, Value};
use std::sync::Arc;

/// Type alias for state assertion functions
type StateAssertion = Box<dyn FnOnce(&Value)>;

/// Type alias for assertions on the outcome of the whole run
type OutcomeAssertion = Box<dyn FnOnce(&Outcome)>;

/// What running a [`StoreTest`] produced
#[derive(Debug)]
pub struct Outcome {
    /// State the test started from
    pub before: Arc<Value>,
    /// State after all actions, or the first handler error
    pub after: Result<Arc<Value>, HandlerError>,
}

/// Fluent API for testing stores with Given-When-Then syntax
///
/// # Example
///
/// ```
/// use composable_flux_core::Store;
/// use composable_flux_core::Action;
/// use composable_flux_testing::StoreTest;
/// use serde_json::json;
///
/// let store = Store::new(0).on("X_A", |s, _| json!(s.as_i64().unwrap_or(0) + 5));
///
/// StoreTest::new(store)
///     .when_action(Action::new("X_A"))
///     .when_action(Action::new("X_A"))
///     .then_state(|state| assert_eq!(state, &json!(10)))
///     .run();
/// ```
pub struct StoreTest {
    store: Store,
    initial_state: Option<Value>,
    actions: Vec<Action>,
    state_assertions: Vec<StateAssertion>,
    outcome_assertions: Vec<OutcomeAssertion>,
}

impl StoreTest {
    /// Create a new store test with the given store
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self {
            store,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            outcome_assertions: Vec::new(),
        }
    }

    /// Start from `state` instead of the store's initial value (Given)
    #[must_use]
    pub fn given_state(mut self, state: impl Into<Value>) -> Self {
        self.initial_state = Some(state.into());
        self
    }

    /// Add an action to fold, in order (When)
    #[must_use]
    pub fn when_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&Value) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Assert that no action changed the state, not even to an equal copy (Then)
    #[must_use]
    #[allow(clippy::panic)] // Test assertion
    pub fn then_unchanged(mut self) -> Self {
        self.outcome_assertions.push(Box::new(|outcome: &Outcome| {
            let after = outcome.after.as_ref().unwrap_or_else(|error| {
                panic!("Expected unchanged state, but a handler failed: {error}")
            });
            assert!(
                Arc::ptr_eq(&outcome.before, after),
                "Expected the very same state, but got {after} (was {})",
                outcome.before
            );
        }));
        self
    }

    /// Assert that a handler failed with `message` (Then)
    #[must_use]
    #[allow(clippy::panic)] // Test assertion
    pub fn then_error(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.outcome_assertions.push(Box::new(move |outcome: &Outcome| {
            match &outcome.after {
                Err(error) => assert_eq!(error.message(), message),
                Ok(state) => panic!("Expected handler error `{message}`, but got state {state}"),
            }
        }));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if any assertion fails, or if state assertions were added and
    /// a handler failed.
    #[allow(clippy::panic)] // Test code can panic
    pub fn run(self) {
        let before = self
            .initial_state
            .map_or_else(|| self.store.initial_state(), Arc::new);

        let mut after = Ok(Arc::clone(&before));
        for action in &self.actions {
            after = after.and_then(|state| self.store.reduce(&state, action));
        }

        let outcome = Outcome { before, after };

        if !self.state_assertions.is_empty() {
            let state = match &outcome.after {
                Ok(state) => state,
                Err(error) => panic!("Handler failed: {error}"),
            };
            for assertion in self.state_assertions {
                assertion(state);
            }
        }

        for assertion in self.outcome_assertions {
            assertion(&outcome);
        }
    }
}

/// Helper assertions for a flux's history and state
pub mod assertions {
    use composable_flux_core::{Action, StateTree, Value};

    /// Assert the action types in `history`, in order
    ///
    /// # Panics
    ///
    /// Panics if the types differ from `expected`.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_history_kinds(history: &[Action], expected: &[&str]) {
        let kinds: Vec<&str> = history.iter().map(Action::kind).collect();
        assert_eq!(
            kinds, expected,
            "Expected history {expected:?}, but found {kinds:?}"
        );
    }

    /// Assert the history as plain JSON objects
    ///
    /// # Panics
    ///
    /// Panics if the history differs from `expected`.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_history_json(history: &[Action], expected: &Value) {
        let actual = Value::Array(history.iter().map(Action::to_value).collect());
        assert_eq!(&actual, expected, "History mismatch");
    }

    /// Assert the whole state tree as plain JSON
    ///
    /// # Panics
    ///
    /// Panics if the state differs from `expected`.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_state_json(state: &StateTree, expected: &Value) {
        assert_eq!(&state.to_json(), expected, "State mismatch");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn counter() -> Store {
        Store::new(0)
            .on("INCREMENT", |s, _| json!(s.as_i64().unwrap_or(0) + 1))
            .try_on("FAIL", |_, _| Err(HandlerError::new("refused")))
    }

    #[test]
    fn test_store_test_increment() {
        StoreTest::new(counter())
            .given_state(41)
            .when_action(Action::new("INCREMENT"))
            .then_state(|state| {
                assert_eq!(state, &json!(42));
            })
            .run();
    }

    #[test]
    fn test_store_test_unchanged() {
        StoreTest::new(counter())
            .when_action(Action::new("SOMETHING_ELSE"))
            .then_unchanged()
            .run();
    }

    #[test]
    fn test_store_test_error() {
        StoreTest::new(counter())
            .when_action(Action::new("INCREMENT"))
            .when_action(Action::new("FAIL"))
            .then_error("refused")
            .run();
    }

    #[test]
    #[should_panic(expected = "Expected the very same state")]
    fn test_store_test_unchanged_detects_change() {
        StoreTest::new(counter())
            .when_action(Action::new("INCREMENT"))
            .then_unchanged()
            .run();
    }

    #[test]
    fn test_history_assertions() {
        let history = [Action::new("Z").with("extra", "ex"), Action::new("X_A")];
        assertions::assert_history_kinds(&history, &["Z", "X_A"]);
        assertions::assert_history_json(
            &history,
            &json!([{ "type": "Z", "extra": "ex" }, { "type": "X_A" }]),
        );
    }
}
