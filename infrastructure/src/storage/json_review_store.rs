//! JSON file backed review store
//!
//! File layout:
//!
//! ```json
//! {
//!   "reviews": { "风府": { "label": "穴位", "task_id": 3, ... } },
//!   "statistics": { "total_reviewed": 1, ... },
//!   "last_updated": "2025-01-01 12:00:00"
//! }
//! ```
//!
//! `statistics` is rewritten from the entries on every save and ignored on
//! load. A missing file is an empty store; an unreadable one is an error.

use super::atomic::{read_if_exists, write_json_atomic};
use annoquorum_application::{ReviewStore, ReviewStoreError};
use annoquorum_domain::{
    MergeSummary, ReviewSnapshot, ReviewStatistics, ReviewTask, StoredDecision,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Deserialize)]
struct StoreFile {
    #[serde(default)]
    reviews: BTreeMap<String, StoredDecision>,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    reviews: &'a BTreeMap<String, StoredDecision>,
    statistics: ReviewStatistics,
    last_updated: String,
}

pub struct JsonReviewStore {
    path: PathBuf,
    state: Mutex<ReviewSnapshot>,
}

impl JsonReviewStore {
    /// Open the store at `path`, loading what is already there
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, ReviewStoreError> {
        let path = path.into();
        let snapshot = match read_if_exists(&path).await? {
            Some(content) => {
                let file: StoreFile =
                    serde_json::from_str(&content).map_err(|e| ReviewStoreError::Corrupt {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    })?;
                ReviewSnapshot {
                    reviews: file.reviews,
                }
            }
            None => {
                debug!("No review store at {}, starting empty", path.display());
                ReviewSnapshot::default()
            }
        };

        info!(
            "Loaded {} stored review decisions from {}",
            snapshot.len(),
            path.display()
        );

        Ok(Self {
            path,
            state: Mutex::new(snapshot),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn save(&self, snapshot: &ReviewSnapshot) -> Result<(), ReviewStoreError> {
        let file = StoreFileRef {
            reviews: &snapshot.reviews,
            statistics: snapshot.statistics(),
            last_updated: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        write_json_atomic(&self.path, &file).await?;
        Ok(())
    }
}

#[async_trait]
impl ReviewStore for JsonReviewStore {
    async fn snapshot(&self) -> Result<ReviewSnapshot, ReviewStoreError> {
        Ok(self.state.lock().await.clone())
    }

    async fn merge(&self, tasks: &[ReviewTask]) -> Result<MergeSummary, ReviewStoreError> {
        let mut state = self.state.lock().await;

        // Merge into a copy so a failed write leaves memory and disk in step
        let mut next = state.clone();
        let summary = next.merge(tasks);
        if summary.written() > 0 {
            self.save(&next).await?;
            *state = next;
        }

        debug!(
            added = summary.added,
            updated = summary.updated,
            unchanged = summary.unchanged,
            "Merged review decisions"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annoquorum_domain::{
        Document, EntityType, Priority, ReviewCandidate, ReviewLabel, ReviewLookup, ReviewReason,
        TaskDecision,
    };

    fn reviewed(id: u64, subject: &str, reason: ReviewReason, label: ReviewLabel) -> ReviewTask {
        let doc = Document::new("卷一", format!("刺{}。", subject));
        let mut task = ReviewTask::from_candidate(
            id,
            &ReviewCandidate {
                subject: subject.to_string(),
                priority: Priority::High,
                reason,
                reported: Default::default(),
            },
            &doc,
            &[],
        );
        task.record(TaskDecision::new(label, "tester", "2025-01-01 00:00:00"));
        task
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonReviewStore::open(dir.path().join("results.json"))
            .await
            .unwrap();
        assert!(store.snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_merge_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("review/results.json");

        let store = JsonReviewStore::open(&path).await.unwrap();
        let summary = store
            .merge(&[
                reviewed(
                    1,
                    "风府",
                    ReviewReason::TypeConflict,
                    ReviewLabel::Type(EntityType::Acupoint),
                ),
                reviewed(2, "卒心痛", ReviewReason::SingleModel, ReviewLabel::Invalid),
            ])
            .await
            .unwrap();
        assert_eq!(summary.added, 2);

        let reopened = JsonReviewStore::open(&path).await.unwrap();
        let snapshot = reopened.snapshot().await.unwrap();
        assert_eq!(
            snapshot.lookup("风府").map(|d| d.label),
            Some(ReviewLabel::Type(EntityType::Acupoint))
        );
        assert_eq!(snapshot.lookup("卒心痛").map(|d| d.task_id), Some(2));

        let stats = reopened.statistics().await.unwrap();
        assert_eq!(stats.total_reviewed, 2);
        assert_eq!(stats.rejected_entities, 1);
        assert_eq!(stats.type_corrections, 1);

        // Statistics and timestamp are written alongside the entries
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["statistics"]["total_reviewed"], 2);
        assert!(raw["last_updated"].is_string());
    }

    #[tokio::test]
    async fn test_merge_twice_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonReviewStore::open(dir.path().join("results.json"))
            .await
            .unwrap();
        let tasks = vec![reviewed(
            1,
            "内关",
            ReviewReason::SingleModel,
            ReviewLabel::Type(EntityType::Acupoint),
        )];

        store.merge(&tasks).await.unwrap();
        let second = store.merge(&tasks).await.unwrap();
        assert_eq!(second.written(), 0);
        assert_eq!(second.unchanged, 1);
        assert_eq!(store.snapshot().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = JsonReviewStore::open(&path).await;
        assert!(matches!(result, Err(ReviewStoreError::Corrupt { .. })));
    }
}
