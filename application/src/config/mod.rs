//! Application-level configuration.
//!
//! - [`ReconcileParams`]: review cap, staleness, concurrency and timeouts

pub mod reconcile_params;

pub use reconcile_params::{DEFAULT_STALE_AFTER_SKIPS, ReconcileParams};
