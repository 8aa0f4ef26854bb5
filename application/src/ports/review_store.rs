//! Review store port
//!
//! The durable subject -> decision mapping. Reads go through snapshots,
//! and `merge` is the single write path.

use annoquorum_domain::{MergeSummary, ReviewSnapshot, ReviewStatistics, ReviewTask};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Error, Debug)]
pub enum ReviewStoreError {
    #[error("Review store at {path} is corrupt: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Consistent copy of every stored decision
    async fn snapshot(&self) -> Result<ReviewSnapshot, ReviewStoreError>;

    /// Fold reviewed tasks in (last writer wins, idempotent)
    async fn merge(&self, tasks: &[ReviewTask]) -> Result<MergeSummary, ReviewStoreError>;

    async fn statistics(&self) -> Result<ReviewStatistics, ReviewStoreError> {
        Ok(self.snapshot().await?.statistics())
    }
}

/// Non-persistent store for tests and dry runs
#[derive(Default)]
pub struct InMemoryReviewStore {
    inner: Mutex<ReviewSnapshot>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: ReviewSnapshot) -> Self {
        Self {
            inner: Mutex::new(snapshot),
        }
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn snapshot(&self) -> Result<ReviewSnapshot, ReviewStoreError> {
        Ok(self.inner.lock().await.clone())
    }

    async fn merge(&self, tasks: &[ReviewTask]) -> Result<MergeSummary, ReviewStoreError> {
        Ok(self.inner.lock().await.merge(tasks))
    }
}
