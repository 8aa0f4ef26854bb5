//! Application layer for annotation-quorum
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DEFAULT_STALE_AFTER_SKIPS, ReconcileParams};
pub use ports::{
    audit_logger::{AuditEvent, AuditLogger, NoAuditLogger},
    extraction_source::{ExtractionSource, SourceError},
    progress::{NoProgress, ProgressNotifier},
    result_writer::{NoResultWriter, ResultWriteError, ResultWriter},
    review_queue::{InMemoryReviewQueue, ReviewQueue, ReviewQueueError},
    review_store::{InMemoryReviewStore, ReviewStore, ReviewStoreError},
};
pub use use_cases::apply_reviews::{ApplyReviewsOutput, ApplyReviewsUseCase};
pub use use_cases::reconcile_batch::{BatchReport, ReconcileBatchUseCase};
pub use use_cases::reconcile_document::{
    DocumentOutcome, DocumentSummary, ReconcileDocumentUseCase, ReconcileError, ResolvedDocument,
};
pub use use_cases::review_session::{DecisionInput, ReviewSessionUseCase};
