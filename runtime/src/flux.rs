//! The dispatcher: flatten, filter, run middleware, fold, commit, notify.

use crate::error::DispatchError;
use crate::metrics::{
    ACTIONS_COMMITTED_TOTAL, DISPATCH_DURATION_SECONDS, DISPATCH_ERRORS_TOTAL, DISPATCH_TOTAL,
    FLUX_LABEL, INPUTS_REJECTED_TOTAL,
};
use crate::FluxConfig;
use composable_flux_core::{
    Action, Middleware, Reducer, StateTree, StoreTree, Subscriber, flatten_actions,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// The Flux - dispatcher for a store tree
///
/// The Flux owns:
/// 1. The store tree (fixed at construction)
/// 2. The current state (replaced wholesale on every committed dispatch)
/// 3. The history of committed actions (append-only)
/// 4. The middleware pipeline (append-only, run in registration order)
/// 5. The subscriber set (identity-based add/remove)
///
/// Its only mutators are [`dispatch`](Self::dispatch),
/// [`dispatch_actions`](Self::dispatch_actions), [`hook`](Self::hook),
/// [`unhook`](Self::unhook) and [`proxy`](Self::proxy). All take `&mut self`,
/// so calls are totally ordered.
///
/// # Example
///
/// ```
/// use composable_flux_core::{Action, StateTree, Store};
/// use composable_flux_runtime::Flux;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let mut flux = Flux::new(Store::new(0).on("X_A", |s, _| json!(s.as_i64().unwrap_or(0) + 5)));
///
/// let listener = Arc::new(|actions: &[Action], state: &Arc<StateTree>| {
///     println!("{} actions -> {}", actions.len(), state.to_json());
/// });
/// flux.hook(Arc::clone(&listener));
///
/// flux.dispatch([json!([{ "type": "X_A" }, { "type": "X_A" }])]).unwrap();
/// assert_eq!(*flux.state(), json!(10));
///
/// assert!(flux.unhook(&listener));
/// ```
pub struct Flux {
    tree: StoreTree,
    state: Arc<StateTree>,
    history: Vec<Action>,
    middleware: Vec<Box<dyn Middleware>>,
    subscribers: Vec<Arc<dyn Subscriber>>,
    config: FluxConfig,
}

impl Flux {
    /// Create a flux over a store tree (or a single store) with default configuration
    #[must_use]
    pub fn new(tree: impl Into<StoreTree>) -> Self {
        Self::with_config(tree, FluxConfig::default())
    }

    /// Create a flux with custom configuration
    ///
    /// # Example
    ///
    /// ```
    /// use composable_flux_core::Store;
    /// use composable_flux_runtime::{Flux, FluxConfig};
    ///
    /// let flux = Flux::with_config(Store::new(0), FluxConfig::default().with_name("counter"));
    /// assert_eq!(flux.config().name, "counter");
    /// ```
    #[must_use]
    pub fn with_config(tree: impl Into<StoreTree>, config: FluxConfig) -> Self {
        let tree = tree.into();
        let state = Arc::new(tree.initial_state());

        tracing::debug!(
            flux = %config.name,
            stores = tree.store_count(),
            "Flux created"
        );

        Self {
            tree,
            state,
            history: Vec::with_capacity(config.history_capacity),
            middleware: Vec::new(),
            subscribers: Vec::new(),
            config,
        }
    }

    /// Dispatch loose arguments: single actions and arbitrarily nested arrays of actions
    ///
    /// Arguments are flattened in order and anything that is not an action
    /// (null, booleans, numbers, strings, objects without a string `type`)
    /// is dropped. If nothing survives, the call does nothing at all.
    /// Otherwise the batch runs through every middleware stage, is folded
    /// into state action by action, appended to history, and every
    /// subscriber is notified once.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] if a middleware stage or a store handler
    /// fails, or if a stage changes the batch length. Nothing is committed
    /// in that case.
    #[tracing::instrument(skip(self, args), fields(flux = %self.config.name))]
    pub fn dispatch<I>(&mut self, args: I) -> Result<(), DispatchError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let batch = flatten_actions(args);
        self.record_rejected(batch.rejected);
        self.run(batch.actions)
    }

    /// Dispatch already-typed actions
    ///
    /// Identical to [`dispatch`](Self::dispatch) minus the flattening. An
    /// action built with an empty type is dropped like any other non-action.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    #[tracing::instrument(skip(self, actions), fields(flux = %self.config.name))]
    pub fn dispatch_actions<I>(&mut self, actions: I) -> Result<(), DispatchError>
    where
        I: IntoIterator<Item = Action>,
    {
        let (actions, dropped): (Vec<Action>, Vec<Action>) =
            actions.into_iter().partition(Action::is_well_formed);
        self.record_rejected(dropped.len());
        self.run(actions)
    }

    /// The current state
    ///
    /// Returns the same `Arc` until the next committed dispatch.
    #[must_use]
    pub fn state(&self) -> Arc<StateTree> {
        Arc::clone(&self.state)
    }

    /// Every committed (post-middleware) action, oldest first
    #[must_use]
    pub fn history(&self) -> &[Action] {
        &self.history
    }

    /// Add a subscriber
    ///
    /// Subscribers form a set keyed by `Arc` identity: hooking the same
    /// `Arc` twice still notifies it once per dispatch.
    pub fn hook<S>(&mut self, listener: Arc<S>)
    where
        S: Subscriber + 'static,
    {
        self.hook_dyn(listener);
    }

    /// Add a subscriber already held as a trait object
    ///
    /// Same set semantics as [`hook`](Self::hook).
    pub fn hook_dyn(&mut self, listener: Arc<dyn Subscriber>) {
        if self.position_of(&listener).is_some() {
            tracing::debug!(flux = %self.config.name, "Subscriber already hooked");
            return;
        }
        self.subscribers.push(listener);
        tracing::debug!(
            flux = %self.config.name,
            subscribers = self.subscribers.len(),
            "Subscriber hooked"
        );
    }

    /// Remove a subscriber by `Arc` identity
    ///
    /// Returns `false` (and does nothing) if it was not hooked.
    pub fn unhook<S>(&mut self, listener: &Arc<S>) -> bool
    where
        S: Subscriber + ?Sized,
    {
        let Some(position) = self.position_of(listener) else {
            return false;
        };
        self.subscribers.remove(position);
        tracing::debug!(
            flux = %self.config.name,
            subscribers = self.subscribers.len(),
            "Subscriber unhooked"
        );
        true
    }

    /// Append a middleware stage to the pipeline
    pub fn proxy<M>(&mut self, middleware: M)
    where
        M: Middleware + 'static,
    {
        self.middleware.push(Box::new(middleware));
        tracing::debug!(
            flux = %self.config.name,
            stages = self.middleware.len(),
            "Middleware registered"
        );
    }

    /// The store tree this flux was built from
    #[must_use]
    pub const fn tree(&self) -> &StoreTree {
        &self.tree
    }

    /// This flux's configuration
    #[must_use]
    pub const fn config(&self) -> &FluxConfig {
        &self.config
    }

    /// Number of hooked subscribers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Number of middleware stages
    #[must_use]
    pub fn middleware_count(&self) -> usize {
        self.middleware.len()
    }

    fn position_of<S>(&self, listener: &Arc<S>) -> Option<usize>
    where
        S: Subscriber + ?Sized,
    {
        let target = Arc::as_ptr(listener);
        self.subscribers
            .iter()
            .position(|existing| std::ptr::addr_eq(Arc::as_ptr(existing), target))
    }

    fn record_rejected(&self, rejected: usize) {
        if rejected == 0 {
            return;
        }
        tracing::trace!(rejected, "Dropped non-action dispatch inputs");
        if self.config.metrics_enabled {
            ::metrics::counter!(INPUTS_REJECTED_TOTAL, FLUX_LABEL => self.config.name.clone())
                .increment(rejected as u64);
        }
    }

    fn run(&mut self, actions: Vec<Action>) -> Result<(), DispatchError> {
        if actions.is_empty() {
            tracing::trace!("Empty batch, nothing to dispatch");
            return Ok(());
        }

        let start = Instant::now();
        let result = self.commit(actions);

        if self.config.metrics_enabled {
            let label = self.config.name.clone();
            ::metrics::counter!(DISPATCH_TOTAL, FLUX_LABEL => label.clone()).increment(1);
            match &result {
                Ok(committed) => {
                    ::metrics::counter!(ACTIONS_COMMITTED_TOTAL, FLUX_LABEL => label.clone())
                        .increment(*committed as u64);
                },
                Err(_) => {
                    ::metrics::counter!(DISPATCH_ERRORS_TOTAL, FLUX_LABEL => label.clone())
                        .increment(1);
                },
            }
            ::metrics::histogram!(DISPATCH_DURATION_SECONDS, FLUX_LABEL => label)
                .record(start.elapsed().as_secs_f64());
        }

        if let Err(error) = &result {
            tracing::warn!(error = %error, "Dispatch failed, nothing committed");
        }

        result.map(|_| ())
    }

    /// Run middleware, fold, then swap in state/history and notify.
    ///
    /// Everything before the swap works on locals, so an error leaves the
    /// flux exactly as it was.
    fn commit(&mut self, actions: Vec<Action>) -> Result<usize, DispatchError> {
        let effective = self.run_middleware(actions)?;

        let Some((first, rest)) = effective.split_first() else {
            return Ok(0);
        };

        let span = tracing::debug_span!("fold", actions = effective.len());
        let next = span.in_scope(|| {
            let mut next = self.tree.reduce(&self.state, first)?;
            for action in rest {
                next = self.tree.reduce(&next, action)?;
            }
            Ok::<_, DispatchError>(next)
        })?;

        let committed = effective.len();
        let start = self.history.len();
        self.state = Arc::new(next);
        self.history.extend(effective);
        tracing::debug!(
            actions = committed,
            history = self.history.len(),
            "Batch committed"
        );

        let batch = &self.history[start..];
        for subscriber in &self.subscribers {
            subscriber.notify(batch, &self.state);
        }
        tracing::trace!(subscribers = self.subscribers.len(), "Subscribers notified");

        Ok(committed)
    }

    fn run_middleware(&self, mut actions: Vec<Action>) -> Result<Vec<Action>, DispatchError> {
        for (stage, middleware) in self.middleware.iter().enumerate() {
            let expected = actions.len();
            actions = middleware
                .process(actions)
                .map_err(|source| DispatchError::Middleware { stage, source })?;

            if actions.len() != expected {
                return Err(DispatchError::BatchLengthMismatch {
                    stage,
                    expected,
                    actual: actions.len(),
                });
            }
            tracing::trace!(stage, actions = expected, "Middleware stage completed");
        }
        Ok(actions)
    }
}

impl fmt::Debug for Flux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flux")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("history", &self.history.len())
            .field("middleware", &self.middleware.len())
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}
