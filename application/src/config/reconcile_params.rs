//! Reconcile parameters: use case control.
//!
//! [`ReconcileParams`] groups the static parameters that control how
//! documents are reconciled and how review work is generated. These are
//! application-layer concerns, not domain policy.

use annoquorum_domain::DEFAULT_REVIEW_CAP;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Skip count after which a pending task is reported as stale
pub const DEFAULT_STALE_AFTER_SKIPS: u32 = 3;

/// Reconcile control parameters.
///
/// | Field                      | Used by                    |
/// |----------------------------|----------------------------|
/// | `review_cap`               | candidate selection        |
/// | `stale_after_skips`        | review listing             |
/// | `max_concurrent_sources`   | per-document fan-out       |
/// | `max_concurrent_documents` | batch runs                 |
/// | `source_timeout`           | every source call          |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileParams {
    /// Disputed entities considered for review per document
    pub review_cap: usize,
    pub stale_after_skips: u32,
    pub max_concurrent_sources: usize,
    pub max_concurrent_documents: usize,
    /// Per-call timeout; `None` waits indefinitely
    pub source_timeout: Option<Duration>,
}

impl Default for ReconcileParams {
    fn default() -> Self {
        Self {
            review_cap: DEFAULT_REVIEW_CAP,
            stale_after_skips: DEFAULT_STALE_AFTER_SKIPS,
            max_concurrent_sources: 4,
            max_concurrent_documents: 2,
            source_timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl ReconcileParams {
    // ==================== Builder Methods ====================

    pub fn with_review_cap(mut self, cap: usize) -> Self {
        self.review_cap = cap;
        self
    }

    pub fn with_stale_after_skips(mut self, skips: u32) -> Self {
        self.stale_after_skips = skips;
        self
    }

    pub fn with_max_concurrent_sources(mut self, max: usize) -> Self {
        self.max_concurrent_sources = max.max(1);
        self
    }

    pub fn with_max_concurrent_documents(mut self, max: usize) -> Self {
        self.max_concurrent_documents = max.max(1);
        self
    }

    pub fn with_source_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.source_timeout = timeout;
        self
    }

    /// Creates params with the timeout given in seconds (0 disables it)
    pub fn with_timeout_seconds(self, seconds: u64) -> Self {
        let timeout = (seconds > 0).then(|| Duration::from_secs(seconds));
        self.with_source_timeout(timeout)
    }
}
