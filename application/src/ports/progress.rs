//! Progress notification port
//!
//! Defines the interface for reporting progress during reconciliation.

use annoquorum_domain::SourceId;

/// Callback for progress updates during a reconcile run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain log lines, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called once before any document is processed
    fn on_batch_start(&self, total_documents: usize);

    /// Called when one source finishes (or fails) for one document
    fn on_source_complete(&self, document: &str, source: &SourceId, success: bool);

    /// Called when a document is resolved or skipped
    fn on_document_complete(&self, document: &str, resolved: bool);

    /// Called after the last document
    fn on_batch_complete(&self) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_batch_start(&self, _total_documents: usize) {}
    fn on_source_complete(&self, _document: &str, _source: &SourceId, _success: bool) {}
    fn on_document_complete(&self, _document: &str, _resolved: bool) {}
}
