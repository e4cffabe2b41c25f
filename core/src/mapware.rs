//! Mapware - one declarative type→handler table, two roles.
//!
//! [`Mapware::middleware`] builds a [`MapMiddleware`]: for every action whose
//! type is mapped, the handler's result is merged over the action's fields.
//! [`Mapware::subscriber`] builds a [`MapSubscriber`]: for every committed
//! action whose type is mapped, the handler is called with the new state.
//!
//! Both builders sit on the same [`HandlerTable`] lookup.
//!
//! # Example
//!
//! ```
//! use composable_flux_core::{Action, Mapware, Middleware};
//! use serde_json::json;
//!
//! let middleware = Mapware::middleware().on("Z", |_| json!({ "extra": "ex" }));
//!
//! let out = middleware
//!     .process(vec![Action::new("Z"), Action::new("X_A")])
//!     .unwrap();
//! assert_eq!(out[0].to_value(), json!({ "type": "Z", "extra": "ex" }));
//! assert_eq!(out[1].to_value(), json!({ "type": "X_A" }));
//! ```

use crate::action::Action;
use crate::error::HandlerError;
use crate::middleware::{Middleware, Subscriber};
use crate::table::HandlerTable;
use crate::tree::StateTree;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type TransformFn = Box<dyn Fn(&Action) -> Value + Send + Sync>;
type ObserveFn = Box<dyn Fn(&StateTree) + Send + Sync>;

/// Entry point for building mapware
#[derive(Debug, Clone, Copy)]
pub struct Mapware;

impl Mapware {
    /// Start a table used as a middleware stage
    #[must_use]
    pub const fn middleware() -> MapMiddleware {
        MapMiddleware {
            table: HandlerTable::new(),
        }
    }

    /// Start a table used as a subscriber
    #[must_use]
    pub const fn subscriber() -> MapSubscriber {
        MapSubscriber {
            table: HandlerTable::new(),
        }
    }
}

/// Type-keyed action rewriting, usable as a middleware stage
pub struct MapMiddleware {
    table: HandlerTable<TransformFn>,
}

impl MapMiddleware {
    /// Map actions of type `kind` through `handler`
    ///
    /// The handler's result is merged over the action: its fields win, a
    /// string `type` renames the action, and a non-object result merges
    /// nothing.
    #[must_use]
    pub fn on<F>(mut self, kind: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Action) -> Value + Send + Sync + 'static,
    {
        self.table.insert(kind, Box::new(handler));
        self
    }

    fn transform(&self, mut action: Action) -> Action {
        if let Some(handler) = self.table.handler_for(&action) {
            if let Value::Object(fields) = handler(&action) {
                action.merge(fields);
            }
        }
        action
    }
}

impl Middleware for MapMiddleware {
    fn process(&self, actions: Vec<Action>) -> Result<Vec<Action>, HandlerError> {
        Ok(actions.into_iter().map(|action| self.transform(action)).collect())
    }
}

impl fmt::Debug for MapMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapMiddleware").field("kinds", &self.table).finish()
    }
}

/// Type-keyed side effects on committed state, usable as a subscriber
pub struct MapSubscriber {
    table: HandlerTable<ObserveFn>,
}

impl MapSubscriber {
    /// Call `handler` with the new state for each committed action of type `kind`
    #[must_use]
    pub fn on<F>(mut self, kind: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&StateTree) + Send + Sync + 'static,
    {
        self.table.insert(kind, Box::new(handler));
        self
    }
}

impl Subscriber for MapSubscriber {
    fn notify(&self, actions: &[Action], state: &Arc<StateTree>) {
        for handler in actions.iter().filter_map(|action| self.table.handler_for(action)) {
            handler(state.as_ref());
        }
    }
}

impl fmt::Debug for MapSubscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapSubscriber").field("kinds", &self.table).finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_middleware_preserves_length_and_order() {
        let middleware = Mapware::middleware()
            .on("Z", |_| json!({ "extra": "ex" }))
            .on("RENAME", |_| json!({ "type": "RENAMED" }));

        let out = middleware
            .process(vec![
                Action::new("A"),
                Action::new("Z").with("extra", "old").with("id", 1),
                Action::new("RENAME"),
            ])
            .unwrap();

        let values: Vec<_> = out.iter().map(Action::to_value).collect();
        assert_eq!(
            values,
            [
                json!({ "type": "A" }),
                json!({ "type": "Z", "extra": "ex", "id": 1 }),
                json!({ "type": "RENAMED" }),
            ]
        );
    }

    #[test]
    fn test_middleware_handler_sees_original_action() {
        let middleware = Mapware::middleware().on("ADD", |action| {
            let n = action.get("n").and_then(Value::as_i64).unwrap_or(0);
            json!({ "doubled": n * 2 })
        });

        let out = middleware.process(vec![Action::new("ADD").with("n", 4)]).unwrap();
        assert_eq!(out[0].get("doubled"), Some(&json!(8)));
        assert_eq!(out[0].get("n"), Some(&json!(4)));
    }

    #[test]
    fn test_middleware_ignores_non_object_results() {
        let middleware = Mapware::middleware().on("A", |_| json!(5));
        let out = middleware.process(vec![Action::new("A").with("x", 1)]).unwrap();
        assert_eq!(out, [Action::new("A").with("x", 1)]);
    }

    #[test]
    fn test_subscriber_calls_once_per_matching_action() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let subscriber = Mapware::subscriber().on("X_A", move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let state = Arc::new(StateTree::Leaf(Arc::new(json!(0))));
        subscriber.notify(&[Action::new("X_A"), Action::new("X_B"), Action::new("X_A")], &state);
        subscriber.notify(&[Action::new("X_B")], &state);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_subscriber_receives_state() {
        let seen = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&seen);
        let subscriber = Mapware::subscriber().on("SAVE", move |state| {
            *slot.lock().unwrap() = Some(state.to_json());
        });

        let state = Arc::new(StateTree::Leaf(Arc::new(json!({ "saved": true }))));
        subscriber.notify(&[Action::new("SAVE")], &state);

        assert_eq!(*seen.lock().unwrap(), Some(json!({ "saved": true })));
    }
}
