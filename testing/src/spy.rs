//! Spies for observing a flux from the outside
//!
//! - [`SpyListener`]: a subscriber that records every notification
//! - [`SpyMiddleware`]: a middleware stage that counts its calls and can
//!   wrap another stage

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning only follows a panicking test

use composable_flux_core::{Action, HandlerError, Middleware, StateTree, Subscriber};
use std::fmt;
use std::sync::{Arc, Mutex};

/// One notification received by a [`SpyListener`]
#[derive(Clone, Debug)]
pub struct RecordedCall {
    /// The committed batch
    pub actions: Vec<Action>,
    /// The state the batch produced
    pub state: Arc<StateTree>,
}

/// A subscriber that records every notification it receives
///
/// Hook it through an `Arc` and keep a clone of the `Arc` to inspect it (and
/// to unhook it later).
///
/// # Example
///
/// ```
/// use composable_flux_core::Store;
/// use composable_flux_runtime::Flux;
/// use composable_flux_testing::SpyListener;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let mut flux = Flux::new(Store::new(0));
/// let listener = Arc::new(SpyListener::new());
/// flux.hook(Arc::clone(&listener));
///
/// flux.dispatch([json!({ "type": "A" }), json!({ "type": "B" })]).unwrap();
///
/// assert_eq!(listener.call_count(), 1);
/// assert_eq!(listener.last_call().unwrap().actions.len(), 2);
/// ```
#[derive(Default)]
pub struct SpyListener {
    calls: Mutex<Vec<RecordedCall>>,
}

impl SpyListener {
    /// Create a spy with no recorded calls
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notifications received
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Whether the spy was never notified
    #[must_use]
    pub fn never_called(&self) -> bool {
        self.call_count() == 0
    }

    /// All notifications, oldest first
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The most recent notification
    #[must_use]
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// Forget all recorded notifications
    pub fn reset(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl Subscriber for SpyListener {
    fn notify(&self, actions: &[Action], state: &Arc<StateTree>) {
        self.calls.lock().unwrap().push(RecordedCall {
            actions: actions.to_vec(),
            state: Arc::clone(state),
        });
    }
}

impl fmt::Debug for SpyListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpyListener")
            .field("calls", &self.call_count())
            .finish()
    }
}

/// A middleware stage that records the batches it sees
///
/// Clones share their recordings, so keep one clone for assertions and
/// hand the other to [`Flux::proxy`](composable_flux_runtime::Flux::proxy).
///
/// # Example
///
/// ```
/// use composable_flux_core::{Mapware, Store};
/// use composable_flux_runtime::Flux;
/// use composable_flux_testing::SpyMiddleware;
/// use serde_json::json;
///
/// let spy = SpyMiddleware::wrap(Mapware::middleware().on("Z", |_| json!({ "extra": "ex" })));
/// let mut flux = Flux::new(Store::new(0));
/// flux.proxy(spy.clone());
///
/// flux.dispatch([json!({ "type": "Z" }), json!({ "type": "X_A" })]).unwrap();
///
/// assert_eq!(spy.call_count(), 1);
/// assert_eq!(flux.history()[0].get("extra"), Some(&json!("ex")));
/// ```
#[derive(Clone)]
pub struct SpyMiddleware {
    inner: Option<Arc<dyn Middleware>>,
    batches: Arc<Mutex<Vec<Vec<Action>>>>,
}

impl SpyMiddleware {
    /// A spy that passes every batch through unchanged
    #[must_use]
    pub fn passthrough() -> Self {
        Self {
            inner: None,
            batches: Arc::default(),
        }
    }

    /// A spy that delegates to `inner` after recording the incoming batch
    #[must_use]
    pub fn wrap<M>(inner: M) -> Self
    where
        M: Middleware + 'static,
    {
        Self {
            inner: Some(Arc::new(inner)),
            batches: Arc::default(),
        }
    }

    /// Number of batches processed
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }

    /// Every incoming batch, oldest first
    #[must_use]
    pub fn batches(&self) -> Vec<Vec<Action>> {
        self.batches.lock().unwrap().clone()
    }
}

impl Middleware for SpyMiddleware {
    fn process(&self, actions: Vec<Action>) -> Result<Vec<Action>, HandlerError> {
        self.batches.lock().unwrap().push(actions.clone());
        match &self.inner {
            Some(inner) => inner.process(actions),
            None => Ok(actions),
        }
    }
}

impl fmt::Debug for SpyMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpyMiddleware")
            .field("wrapping", &self.inner.is_some())
            .field("calls", &self.call_count())
            .finish()
    }
}
