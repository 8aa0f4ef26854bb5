//! Port for structured audit logging.
//!
//! Defines the [`AuditLogger`] trait for recording reconciliation events
//! (documents resolved or skipped, review tasks enqueued, reviews merged)
//! to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures a
//! machine-readable record (JSONL) of what the engine decided.

use serde_json::Value;

/// A structured audit event.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. The adapter adds the timestamp.
pub struct AuditEvent {
    /// Event type identifier (e.g., "document_resolved", "reviews_merged").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl AuditEvent {
    pub const REVIEW_ENQUEUED: &'static str = "review_enqueued";
    pub const REVIEWS_MERGED: &'static str = "reviews_merged";
    pub const DOCUMENT_RESOLVED: &'static str = "document_resolved";
    pub const DOCUMENT_SKIPPED: &'static str = "document_skipped";

    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging audit events.
///
/// The `log` method is synchronous and non-fallible: a failed audit write
/// never aborts reconciliation.
pub trait AuditLogger: Send + Sync {
    fn log(&self, event: AuditEvent);
}

/// No-op implementation for tests and when audit logging is disabled.
pub struct NoAuditLogger;

impl AuditLogger for NoAuditLogger {
    fn log(&self, _event: AuditEvent) {}
}
