//! Metric names emitted by the dispatcher.
//!
//! Metrics go through the `metrics` facade. Without an installed recorder
//! every emission is a no-op, so a `Flux` never requires one. Hosts that
//! install a recorder call [`register_metrics`] once to attach descriptions.
//!
//! Every metric carries a `flux` label with the instance's configured name.

use metrics::{Unit, describe_counter, describe_histogram};

/// Dispatch calls that reached the middleware pipeline
pub const DISPATCH_TOTAL: &str = "flux_dispatch_total";

/// Actions committed to state and history
pub const ACTIONS_COMMITTED_TOTAL: &str = "flux_actions_committed_total";

/// Dispatch inputs dropped because they were not actions
pub const INPUTS_REJECTED_TOTAL: &str = "flux_inputs_rejected_total";

/// Dispatch calls that failed and committed nothing
pub const DISPATCH_ERRORS_TOTAL: &str = "flux_dispatch_errors_total";

/// Time from middleware entry to subscriber notification
pub const DISPATCH_DURATION_SECONDS: &str = "flux_dispatch_duration_seconds";

/// Label carrying the flux instance name
pub const FLUX_LABEL: &str = "flux";

/// Register all metric descriptions with the installed recorder
pub fn register_metrics() {
    describe_counter!(
        DISPATCH_TOTAL,
        Unit::Count,
        "Total number of non-empty dispatch calls"
    );
    describe_counter!(
        ACTIONS_COMMITTED_TOTAL,
        Unit::Count,
        "Total number of actions committed to state and history"
    );
    describe_counter!(
        INPUTS_REJECTED_TOTAL,
        Unit::Count,
        "Total number of dispatch inputs dropped as non-actions"
    );
    describe_counter!(
        DISPATCH_ERRORS_TOTAL,
        Unit::Count,
        "Total number of dispatch calls that failed"
    );
    describe_histogram!(
        DISPATCH_DURATION_SECONDS,
        Unit::Seconds,
        "Time taken to run middleware, fold and notify for one dispatch"
    );
}
