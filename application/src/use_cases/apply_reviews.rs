//! Apply Reviews use case
//!
//! Moves reviewed tasks from the queue into the review store. The store is
//! written before the queue drops anything, and the queue drops only the
//! tasks that were merged. Merging is idempotent, so a crash between the two
//! steps only means the same tasks merge again next time.

use super::reconcile_document::ReconcileError;
use crate::ports::audit_logger::{AuditEvent, AuditLogger, NoAuditLogger};
use crate::ports::review_queue::ReviewQueue;
use crate::ports::review_store::ReviewStore;
use annoquorum_domain::{MergeSummary, ReviewStatistics};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyReviewsOutput {
    pub applied_tasks: usize,
    pub merge: MergeSummary,
    pub statistics: ReviewStatistics,
}

pub struct ApplyReviewsUseCase {
    store: Arc<dyn ReviewStore>,
    queue: Arc<dyn ReviewQueue>,
    audit: Arc<dyn AuditLogger>,
}

impl ApplyReviewsUseCase {
    pub fn new(store: Arc<dyn ReviewStore>, queue: Arc<dyn ReviewQueue>) -> Self {
        Self {
            store,
            queue,
            audit: Arc::new(NoAuditLogger),
        }
    }

    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    pub async fn execute(&self) -> Result<ApplyReviewsOutput, ReconcileError> {
        let completed = self.queue.completed().await?;
        let merge = self.store.merge(&completed).await?;

        // Only what was merged leaves the queue; later decisions wait for the next run.
        let merged_ids: BTreeSet<u64> = completed.iter().map(|t| t.id).collect();
        let removed = self.queue.remove_completed(&merged_ids).await?;
        debug!("Removed {} merged tasks from the queue", removed.len());

        let statistics = self.store.statistics().await?;
        let applied_tasks = completed.len();

        info!(
            "Applied {} reviews ({} added, {} updated)",
            applied_tasks, merge.added, merge.updated
        );
        self.audit.log(AuditEvent::new(
            AuditEvent::REVIEWS_MERGED,
            json!({
                "applied_tasks": applied_tasks,
                "merge": merge,
                "statistics": statistics,
            }),
        ));

        Ok(ApplyReviewsOutput {
            applied_tasks,
            merge,
            statistics,
        })
    }
}
