//! Review Session use case
//!
//! The request/response side of human review: list pending work, record a
//! decision or a skip, and summarize progress. Nothing here blocks on a
//! reviewer.

use super::reconcile_document::ReconcileError;
use crate::ports::review_queue::ReviewQueue;
use crate::ports::review_store::ReviewStore;
use annoquorum_domain::{
    Confidence, ReviewLabel, ReviewReport, ReviewStatistics, ReviewTask, TaskDecision,
};
use std::sync::Arc;
use tracing::{debug, info};

/// A reviewer's answer to one task
#[derive(Debug, Clone)]
pub struct DecisionInput {
    pub task_id: u64,
    pub label: ReviewLabel,
    pub confidence: Confidence,
    pub reviewer: String,
    pub notes: String,
}

impl DecisionInput {
    pub fn new(task_id: u64, label: ReviewLabel, reviewer: impl Into<String>) -> Self {
        Self {
            task_id,
            label,
            confidence: Confidence::High,
            reviewer: reviewer.into(),
            notes: String::new(),
        }
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

pub struct ReviewSessionUseCase {
    store: Arc<dyn ReviewStore>,
    queue: Arc<dyn ReviewQueue>,
    stale_after_skips: u32,
}

impl ReviewSessionUseCase {
    pub fn new(store: Arc<dyn ReviewStore>, queue: Arc<dyn ReviewQueue>, stale_after_skips: u32) -> Self {
        Self {
            store,
            queue,
            stale_after_skips,
        }
    }

    /// Pending tasks in presentation order
    pub async fn pending(&self) -> Result<Vec<ReviewTask>, ReconcileError> {
        Ok(self.queue.pending().await?)
    }

    /// Pending tasks skipped often enough to need attention
    pub async fn stale(&self) -> Result<Vec<ReviewTask>, ReconcileError> {
        Ok(self.queue.stale(self.stale_after_skips).await?)
    }

    pub async fn decide(&self, input: DecisionInput) -> Result<ReviewTask, ReconcileError> {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let decision = TaskDecision::new(input.label, input.reviewer, timestamp)
            .with_confidence(input.confidence)
            .with_notes(input.notes);
        let task = self.queue.record_decision(input.task_id, decision).await?;
        info!("Task {} ({}) labeled {}", task.id, task.subject, input.label);
        Ok(task)
    }

    pub async fn skip(&self, task_id: u64) -> Result<ReviewTask, ReconcileError> {
        let task = self.queue.skip(task_id).await?;
        debug!("Task {} skipped {} times", task.id, task.skip_count);
        Ok(task)
    }

    /// Report over the tasks currently queued, plus store statistics
    pub async fn report(&self) -> Result<(ReviewReport, ReviewStatistics), ReconcileError> {
        let tasks = self.queue.tasks().await?;
        let statistics = self.store.statistics().await?;
        Ok((ReviewReport::build(&tasks), statistics))
    }
}
