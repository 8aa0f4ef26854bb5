//! JSON file backed review queue (`{next_id, tasks}`)
//!
//! Every mutation is applied to a copy of the state, written to disk, and
//! only then made visible. `next_id` is persisted with the tasks, so ids
//! stay unique across reopen even after reviewed tasks were taken out.

use super::atomic::{read_if_exists, write_json_atomic};
use annoquorum_application::{ReviewQueue, ReviewQueueError};
use annoquorum_domain::{ReviewQueueState, ReviewTask, TaskDecision};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub struct JsonReviewQueue {
    path: PathBuf,
    stale_threshold: u32,
    state: Mutex<ReviewQueueState>,
}

impl JsonReviewQueue {
    pub async fn open(
        path: impl Into<PathBuf>,
        stale_threshold: u32,
    ) -> Result<Self, ReviewQueueError> {
        let path = path.into();
        let state = match read_if_exists(&path).await? {
            Some(content) => {
                serde_json::from_str::<ReviewQueueState>(&content).map_err(|e| {
                    ReviewQueueError::Corrupt {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    }
                })?
            }
            None => ReviewQueueState::default(),
        };

        info!(
            "Loaded {} review tasks from {} (next id {})",
            state.tasks.len(),
            path.display(),
            state.next_id
        );

        Ok(Self {
            path,
            stale_threshold,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `f` to a copy of the state, persist, then commit
    async fn mutate<T, F>(&self, f: F) -> Result<T, ReviewQueueError>
    where
        F: FnOnce(&mut ReviewQueueState) -> Result<T, ReviewQueueError>,
    {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let result = f(&mut next)?;
        if next != *state {
            write_json_atomic(&self.path, &next).await?;
            *state = next;
        }
        Ok(result)
    }
}

#[async_trait]
impl ReviewQueue for JsonReviewQueue {
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
        let offered = tasks.len();
        let accepted = self.mutate(|state| Ok(state.enqueue(tasks))).await?;
        debug!(
            "Enqueued {} of {} review tasks into {}",
            accepted.len(),
            offered,
            self.path.display()
        );
        Ok(accepted)
    }

    async fn record_decision(
        &self,
        id: u64,
        decision: TaskDecision,
    ) -> Result<ReviewTask, ReviewQueueError> {
        self.mutate(|state| Ok(state.record_decision(id, decision)?))
            .await
    }

    async fn skip(&self, id: u64) -> Result<ReviewTask, ReviewQueueError> {
        self.mutate(|state| Ok(state.skip(id)?)).await
    }

    async fn completed(&self) -> Result<Vec<ReviewTask>, ReviewQueueError> {
        Ok(self.state.lock().await.completed())
    }

    async fn remove_completed(
        &self,
        ids: &BTreeSet<u64>,
    ) -> Result<Vec<ReviewTask>, ReviewQueueError> {
        self.mutate(|state| Ok(state.remove_completed(ids))).await
    }

    async fn stale(&self, threshold: u32) -> Result<Vec<ReviewTask>, ReviewQueueError> {
        Ok(self.state.lock().await.stale(threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annoquorum_domain::{
        Document, DomainError, EntityType, Priority, ReviewCandidate, ReviewLabel, ReviewReason,
    };

    fn candidate_task(subject: &str) -> ReviewTask {
        let doc = Document::new("卷一", "热病头痛，刺风府。卒心痛，取内关。");
        ReviewTask::from_candidate(
            0,
            &ReviewCandidate {
                subject: subject.to_string(),
                priority: Priority::Medium,
                reason: ReviewReason::SingleModel,
                reported: Default::default(),
            },
            &doc,
            &[],
        )
    }

    fn decision() -> TaskDecision {
        TaskDecision::new(
            ReviewLabel::Type(EntityType::Acupoint),
            "tester",
            "2025-01-01 00:00:00",
        )
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");

        let queue = JsonReviewQueue::open(&path, 3).await.unwrap();
        let accepted = queue
            .enqueue(vec![candidate_task("风府"), candidate_task("内关")])
            .await
            .unwrap();
        assert_eq!(accepted.iter().map(|t| t.id).collect::<Vec<_>>(), [1, 2]);

        queue.record_decision(2, decision()).await.unwrap();
        let taken = queue.remove_completed(&BTreeSet::from([2])).await.unwrap();
        assert_eq!(taken.len(), 1);
        drop(queue);

        let reopened = JsonReviewQueue::open(&path, 3).await.unwrap();
        assert_eq!(reopened.tasks().await.unwrap().len(), 1);
        let accepted = reopened
            .enqueue(vec![candidate_task("卒心痛")])
            .await
            .unwrap();
        assert_eq!(accepted[0].id, 3);
    }

    #[tokio::test]
    async fn test_enqueue_is_idempotent_by_subject() {
        let dir = tempfile::tempdir().unwrap();
        let queue = JsonReviewQueue::open(dir.path().join("tasks.json"), 3)
            .await
            .unwrap();

        queue.enqueue(vec![candidate_task("风府")]).await.unwrap();
        let again = queue.enqueue(vec![candidate_task("风府")]).await.unwrap();
        assert!(again.is_empty());
        assert_eq!(queue.pending().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_skip_persists_and_marks_stale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let queue = JsonReviewQueue::open(&path, 2).await.unwrap();
        queue.enqueue(vec![candidate_task("风府")]).await.unwrap();

        queue.skip(1).await.unwrap();
        queue.skip(1).await.unwrap();
        drop(queue);

        let reopened = JsonReviewQueue::open(&path, 2).await.unwrap();
        let stale = reopened.stale(2).await.unwrap();
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].skip_count, 2);
        // stale tasks are still pending
        assert_eq!(reopened.pending().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_task_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let queue = JsonReviewQueue::open(dir.path().join("tasks.json"), 3)
            .await
            .unwrap();
        let err = queue.record_decision(42, decision()).await.unwrap_err();
        assert!(matches!(
            err,
            ReviewQueueError::Task(DomainError::TaskNotFound(42))
        ));
        // nothing written for a failed mutation
        assert!(!dir.path().join("tasks.json").exists());
    }

    #[tokio::test]
    async fn test_corrupt_queue_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "[1, 2").unwrap();
        let result = JsonReviewQueue::open(&path, 3).await;
        assert!(matches!(result, Err(ReviewQueueError::Corrupt { .. })));
    }
}
