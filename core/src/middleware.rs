//! The two extension seams of a dispatcher: middleware and subscribers.
//!
//! Middleware sees every batch before it is committed and may rewrite its
//! actions; subscribers see every batch after it is committed, together with
//! the state it produced.

use crate::action::Action;
use crate::error::HandlerError;
use crate::tree::StateTree;
use std::sync::Arc;

/// A stage in the pre-commit pipeline
///
/// A stage is called once per dispatch with the whole batch and must return
/// a batch of the same length. Returning an error fails the dispatch.
///
/// Closures of the right shape are middleware:
///
/// ```
/// use composable_flux_core::{Action, HandlerError, Middleware};
/// use serde_json::json;
///
/// let stamp = |actions: Vec<Action>| -> Result<Vec<Action>, HandlerError> {
///     Ok(actions.into_iter().map(|a| a.with("stamped", true)).collect())
/// };
///
/// let out = stamp.process(vec![Action::new("A")]).unwrap();
/// assert_eq!(out[0].get("stamped"), Some(&json!(true)));
/// ```
pub trait Middleware: Send + Sync {
    /// Transform a batch of actions
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] when the batch cannot be processed.
    fn process(&self, actions: Vec<Action>) -> Result<Vec<Action>, HandlerError>;
}

impl<F> Middleware for F
where
    F: Fn(Vec<Action>) -> Result<Vec<Action>, HandlerError> + Send + Sync,
{
    fn process(&self, actions: Vec<Action>) -> Result<Vec<Action>, HandlerError> {
        self(actions)
    }
}

/// A listener notified after each committed batch
///
/// Called exactly once per dispatch that commits, with the effective
/// (post-middleware) batch and the state it produced.
pub trait Subscriber: Send + Sync {
    /// Observe a committed batch
    fn notify(&self, actions: &[Action], state: &Arc<StateTree>);
}

impl<F> Subscriber for F
where
    F: Fn(&[Action], &Arc<StateTree>) + Send + Sync,
{
    fn notify(&self, actions: &[Action], state: &Arc<StateTree>) {
        self(actions, state);
    }
}
