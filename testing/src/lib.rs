//! # Composable Flux Testing
//!
//! Testing utilities and helpers for Composable Flux.
//!
//! This crate provides:
//! - Spies that record how a flux calls its subscribers and middleware
//! - A Given-When-Then builder for testing a single store
//! - Assertion helpers for history and state
//! - A sample store tree used across the workspace's tests
//!
//! ## Example
//!
//! ```
//! use composable_flux_runtime::Flux;
//! use composable_flux_testing::{SpyListener, fixtures};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let mut flux = Flux::new(fixtures::sample_tree());
//! let listener = Arc::new(SpyListener::new());
//! flux.hook(Arc::clone(&listener));
//!
//! flux.dispatch([json!({ "type": fixtures::X_A })]).unwrap();
//!
//! assert_eq!(listener.call_count(), 1);
//! assert_eq!(flux.state().pointer("/storeA/propAA"), Some(&json!(123)));
//! ```

pub mod fixtures;
pub mod spy;
pub mod store_test;

pub use spy::{RecordedCall, SpyListener, SpyMiddleware};
pub use store_test::{StoreTest, assertions};

/// Install a `tracing` subscriber for test output
///
/// Honors `RUST_LOG` and defaults to debug output from the runtime. Safe to
/// call from every test: only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "composable_flux_runtime=debug".into()),
        )
        .with_test_writer()
        .try_init();
}
