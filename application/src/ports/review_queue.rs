//! Review queue port
//!
//! Pending review tasks. The engine emits tasks here and later collects
//! the decisions recorded against them; it never waits for a reviewer.

use annoquorum_domain::{DomainError, ReviewQueueState, ReviewTask, TaskDecision};
use async_trait::async_trait;
use std::collections::BTreeSet;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Error, Debug)]
pub enum ReviewQueueError {
    #[error("Review queue at {path} is corrupt: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Task(#[from] DomainError),
}

#[async_trait]
pub trait ReviewQueue: Send + Sync {
    /// Every queued task, pending or reviewed, in id order
    async fn tasks(&self) -> Result<Vec<ReviewTask>, ReviewQueueError>;

    /// Pending tasks in presentation order
    async fn pending(&self) -> Result<Vec<ReviewTask>, ReviewQueueError>;

    async fn pending_subjects(&self) -> Result<BTreeSet<String>, ReviewQueueError>;

    /// Add tasks; ids are assigned here and subjects already queued are
    /// skipped. Returns the accepted tasks.
    async fn enqueue(&self, tasks: Vec<ReviewTask>) -> Result<Vec<ReviewTask>, ReviewQueueError>;

    async fn record_decision(
        &self,
        id: u64,
        decision: TaskDecision,
    ) -> Result<ReviewTask, ReviewQueueError>;

    async fn skip(&self, id: u64) -> Result<ReviewTask, ReviewQueueError>;

    /// Reviewed tasks still in the queue
    async fn completed(&self) -> Result<Vec<ReviewTask>, ReviewQueueError>;

    /// Remove and return the reviewed tasks among `ids`
    async fn remove_completed(
        &self,
        ids: &BTreeSet<u64>,
    ) -> Result<Vec<ReviewTask>, ReviewQueueError>;

    /// Pending tasks skipped at least `threshold` times
    async fn stale(&self, threshold: u32) -> Result<Vec<ReviewTask>, ReviewQueueError>;
}

/// Non-persistent queue for tests and dry runs
pub struct InMemoryReviewQueue {
    state: Mutex<ReviewQueueState>,
    stale_threshold: u32,
}

impl InMemoryReviewQueue {
    pub fn new(stale_threshold: u32) -> Self {
        Self {
            state: Mutex::new(ReviewQueueState::default()),
            stale_threshold,
        }
    }
}

impl Default for InMemoryReviewQueue {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_STALE_AFTER_SKIPS)
    }
}

#[async_trait]
impl ReviewQueue for InMemoryReviewQueue {
    async fn tasks(&self) -> Result<Vec<ReviewTask>, ReviewQueueError> {
        Ok(self.state.lock().await.tasks.clone())
    }

    async fn pending(&self) -> Result<Vec<ReviewTask>, ReviewQueueError> {
        Ok(self.state.lock().await.pending(self.stale_threshold))
    }

    async fn pending_subjects(&self) -> Result<BTreeSet<String>, ReviewQueueError> {
        Ok(self.state.lock().await.pending_subjects())
    }

    async fn enqueue(&self, tasks: Vec<ReviewTask>) -> Result<Vec<ReviewTask>, ReviewQueueError> {
        Ok(self.state.lock().await.enqueue(tasks))
    }

    async fn record_decision(
        &self,
        id: u64,
        decision: TaskDecision,
    ) -> Result<ReviewTask, ReviewQueueError> {
        Ok(self.state.lock().await.record_decision(id, decision)?)
    }

    async fn skip(&self, id: u64) -> Result<ReviewTask, ReviewQueueError> {
        Ok(self.state.lock().await.skip(id)?)
    }

    async fn completed(&self) -> Result<Vec<ReviewTask>, ReviewQueueError> {
        Ok(self.state.lock().await.completed())
    }

    async fn remove_completed(
        &self,
        ids: &BTreeSet<u64>,
    ) -> Result<Vec<ReviewTask>, ReviewQueueError> {
        Ok(self.state.lock().await.remove_completed(ids))
    }

    async fn stale(&self, threshold: u32) -> Result<Vec<ReviewTask>, ReviewQueueError> {
        Ok(self.state.lock().await.stale(threshold))
    }
}
