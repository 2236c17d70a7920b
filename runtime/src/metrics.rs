//! Metric names and descriptions for the store.
//!
//! The store records through the `metrics` facade; install any recorder
//! (Prometheus, statsd, ...) in the application to collect them.

use metrics::{describe_counter, describe_histogram, Unit};

/// Actions applied by a store
pub const ACTIONS_TOTAL: &str = "store.actions.total";

/// Actions rejected because the store was shutting down
pub const REJECTED_ACTIONS: &str = "store.shutdown.rejected_actions";

/// Time spent inside the reducer for one action
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Register descriptions for every store metric with the installed recorder.
///
/// Call once after installing a recorder; metrics are recorded either way.
pub fn register_metrics() {
    describe_counter!(ACTIONS_TOTAL, Unit::Count, "Actions applied by a store");
    describe_counter!(
        REJECTED_ACTIONS,
        Unit::Count,
        "Actions rejected because the store was shutting down"
    );
    describe_histogram!(
        REDUCER_DURATION,
        Unit::Seconds,
        "Time spent inside the reducer for one action"
    );
}
