//! # Composable Flux Runtime
//!
//! The dispatcher that drives a store tree.
//!
//! ## Core Components
//!
//! - **Flux**: Owns the store tree, the current state, the history, the
//!   middleware pipeline and the subscriber set
//! - **Dispatch**: Flatten → filter → middleware → fold → commit → notify,
//!   atomically per call
//! - **Config**: Naming, metrics and history sizing for a Flux instance
//!
//! ## Example
//!
//! ```
//! use composable_flux_core::{Mapware, Store, StoreTree};
//! use composable_flux_runtime::Flux;
//! use serde_json::json;
//!
//! let tree = StoreTree::map([
//!     ("count", Store::new(0).on("ADD", |s, _| json!(s.as_i64().unwrap_or(0) + 5)).into()),
//! ]);
//!
//! let mut flux = Flux::new(tree);
//! flux.proxy(Mapware::middleware().on("ADD", |_| json!({ "source": "docs" })));
//!
//! flux.dispatch([json!([{ "type": "ADD" }, { "type": "ADD" }]), json!(null)])
//!     .unwrap();
//!
//! assert_eq!(flux.state().to_json(), json!({ "count": 10 }));
//! assert_eq!(flux.history().len(), 2);
//! assert_eq!(flux.history()[0].get("source"), Some(&json!("docs")));
//! ```

pub use composable_flux_core::{
    Action, HandlerError, Mapware, Middleware, ReduceError, Reducer, StateTree, Store,
    StoreTree, Subscriber,
};

/// Metric names and registration for dispatch observability
pub mod metrics;

/// The Flux dispatcher
pub mod flux;

pub use flux::Flux;

/// Error types for the Flux runtime
pub mod error {
    use composable_flux_core::{HandlerError, ReduceError};
    use thiserror::Error;

    /// Errors that fail a dispatch
    ///
    /// A failed dispatch commits nothing: state and history are unchanged
    /// and no subscriber is notified.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum DispatchError {
        /// A store handler failed while folding the batch
        #[error("reducer failed during dispatch: {0}")]
        Reduce(#[from] ReduceError),

        /// A middleware stage returned an error
        #[error("middleware stage {stage} failed")]
        Middleware {
            /// Zero-based position of the stage in the pipeline
            stage: usize,
            /// The stage's own error
            #[source]
            source: HandlerError,
        },

        /// A middleware stage changed the number of actions in the batch
        ///
        /// Stages may rewrite actions but never add or drop them.
        #[error("middleware stage {stage} returned {actual} actions, expected {expected}")]
        BatchLengthMismatch {
            /// Zero-based position of the stage in the pipeline
            stage: usize,
            /// Batch length handed to the stage
            expected: usize,
            /// Batch length the stage returned
            actual: usize,
        },
    }
}

pub use error::DispatchError;

/// Configuration for Flux instances
///
/// # Example
///
/// ```
/// use composable_flux_runtime::FluxConfig;
///
/// let config = FluxConfig::default()
///     .with_name("editor")
///     .with_metrics(false)
///     .with_history_capacity(1024);
///
/// assert_eq!(config.name, "editor");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FluxConfig {
    /// Label attached to log spans and metrics
    pub name: String,
    /// Whether dispatches record metrics
    pub metrics_enabled: bool,
    /// Initial history allocation (history itself is never truncated)
    pub history_capacity: usize,
}

impl FluxConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub fn new(name: impl Into<String>, metrics_enabled: bool, history_capacity: usize) -> Self {
        Self {
            name: name.into(),
            metrics_enabled,
            history_capacity,
        }
    }

    /// Set the instance name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enable or disable metrics
    #[must_use]
    pub const fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }

    /// Set the initial history allocation
    #[must_use]
    pub const fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }
}

impl Default for FluxConfig {
    fn default() -> Self {
        Self {
            name: "flux".to_string(),
            metrics_enabled: true,
            history_capacity: 64,
        }
    }
}
