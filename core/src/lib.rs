//! # Composable Flux Core
//!
//! Core types for the Composable Flux state engine.
//!
//! This crate provides the pieces a dispatcher is assembled from. It has no
//! runtime of its own: the `Flux` dispatcher lives in `composable-flux-runtime`.
//!
//! ## Core Concepts
//!
//! - **Action**: A record with a `type` tag and an opaque JSON payload
//! - **Store**: A leaf reducer unit (initial value + type-keyed handlers)
//! - **Store Tree**: Stores nested in ordered sequences and keyed maps
//! - **State Tree**: The derived state, mirroring the store tree's shape
//! - **Middleware**: Batch transforms run before actions are committed
//! - **Subscriber**: Listeners notified once per committed batch
//! - **Mapware**: A type-keyed handler table usable as middleware or subscriber
//!
//! ## Example
//!
//! ```
//! use composable_flux_core::{Action, Reducer, Store, StoreTree};
//! use serde_json::json;
//!
//! let tree = StoreTree::map([
//!     ("counter", Store::new(0).on("INCREMENT", |state, _| json!(state.as_i64().unwrap_or(0) + 1)).into()),
//!     ("title", Store::new("untitled").into()),
//! ]);
//!
//! let state = tree.initial_state();
//! let next = tree.reduce(&state, &Action::new("INCREMENT")).unwrap();
//! assert_eq!(next.to_json(), json!({ "counter": 1, "title": "untitled" }));
//! ```

pub mod action;
pub mod batch;
pub mod error;
pub mod mapware;
pub mod middleware;
pub mod store;
pub mod table;
pub mod tree;

pub use action::Action;
pub use batch::{FlattenedBatch, flatten_actions};
pub use error::{HandlerError, ReduceError, StorePath};
pub use mapware::{MapMiddleware, MapSubscriber, Mapware};
pub use middleware::{Middleware, Subscriber};
pub use store::Store;
pub use table::HandlerTable;
pub use tree::{StateTree, StoreTree};

// Re-export the JSON types actions and state are built from
pub use serde_json::{Map, Value};

/// The Reducer trait - pure state transitions driven by actions
///
/// Implemented by a single [`Store`] (state is one JSON value) and by a whole
/// [`StoreTree`] (state is a [`StateTree`] of the same shape).
///
/// # Example
///
/// ```
/// use composable_flux_core::{Action, Reducer, Store};
/// use serde_json::json;
///
/// let store = Store::new(0).on("ADD", |state, action| {
///     let by = action.get("by").and_then(|v| v.as_i64()).unwrap_or(1);
///     json!(state.as_i64().unwrap_or(0) + by)
/// });
///
/// let state = store.initial_state();
/// let next = store.reduce(&state, &Action::new("ADD").with("by", 5)).unwrap();
/// assert_eq!(*next, json!(5));
/// ```
pub trait Reducer {
    /// The state type this reducer folds actions into
    type State;

    /// The error raised when a transition fails
    type Error;

    /// Derive the initial state
    fn initial_state(&self) -> Self::State;

    /// Fold one action into `state`, producing the next state
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` when a handler for the action fails.
    fn reduce(&self, state: &Self::State, action: &Action) -> Result<Self::State, Self::Error>;
}
