//! Durable subject -> decision mapping, as a pure value
//!
//! [`ReviewSnapshot`] is the in-memory content of the review store. Adapters
//! in the infrastructure layer persist it; everything else reads it through
//! [`ReviewLookup`].

use super::task::{ReviewLabel, ReviewReason, ReviewTask};
use crate::core::confidence::Confidence;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read access to stored review decisions
pub trait ReviewLookup: Send + Sync {
    /// Decision recorded for a subject text, if any
    fn lookup(&self, subject: &str) -> Option<StoredDecision>;

    fn contains(&self, subject: &str) -> bool {
        self.lookup(subject).is_some()
    }
}

/// One reviewer decision as kept in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDecision {
    pub label: ReviewLabel,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default)]
    pub reviewer: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub notes: String,
    pub task_id: u64,
    pub reason: ReviewReason,
}

/// Counts derived from the stored entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewStatistics {
    pub total_reviewed: usize,
    /// Entries whose label is an entity type
    pub confirmed_entities: usize,
    /// Entries labeled invalid
    pub rejected_entities: usize,
    /// Conflicts settled with a concrete type
    pub type_corrections: usize,
}

/// Outcome of folding reviewed tasks into the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSummary {
    /// Subjects seen for the first time
    pub added: usize,
    /// Subjects whose stored decision changed
    pub updated: usize,
    /// Subjects whose stored decision was already identical
    pub unchanged: usize,
    /// Tasks passed in without a decision
    pub ignored_pending: usize,
}

impl MergeSummary {
    pub fn written(&self) -> usize {
        self.added + self.updated
    }
}

/// Full review store content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSnapshot {
    #[serde(default)]
    pub reviews: BTreeMap<String, StoredDecision>,
}

impl ReviewSnapshot {
    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    /// Fold reviewed tasks in, last writer wins.
    ///
    /// Merging the same tasks again leaves the snapshot unchanged.
    pub fn merge(&mut self, tasks: &[ReviewTask]) -> MergeSummary {
        let mut summary = MergeSummary::default();
        for task in tasks {
            let Some(decision) = &task.decision else {
                summary.ignored_pending += 1;
                continue;
            };
            let entry = StoredDecision {
                label: decision.label,
                confidence: decision.confidence,
                reviewer: decision.reviewer.clone(),
                timestamp: decision.timestamp.clone(),
                notes: decision.notes.clone(),
                task_id: task.id,
                reason: task.reason,
            };
            match self.reviews.insert(task.subject.clone(), entry.clone()) {
                None => summary.added += 1,
                Some(previous) if previous == entry => summary.unchanged += 1,
                Some(_) => summary.updated += 1,
            }
        }
        summary
    }

    pub fn statistics(&self) -> ReviewStatistics {
        let mut stats = ReviewStatistics {
            total_reviewed: self.reviews.len(),
            ..Default::default()
        };
        for decision in self.reviews.values() {
            if decision.label.is_invalid() {
                stats.rejected_entities += 1;
            } else {
                stats.confirmed_entities += 1;
                if decision.reason == ReviewReason::TypeConflict {
                    stats.type_corrections += 1;
                }
            }
        }
        stats
    }
}

impl ReviewLookup for ReviewSnapshot {
    fn lookup(&self, subject: &str) -> Option<StoredDecision> {
        self.reviews.get(subject).cloned()
    }

    fn contains(&self, subject: &str) -> bool {
        self.reviews.contains_key(subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Document, EntityType};
    use crate::review::task::{Priority, ReviewCandidate, TaskDecision};

    fn reviewed(id: u64, subject: &str, reason: ReviewReason, label: ReviewLabel) -> ReviewTask {
        let doc = Document::new("卷一", format!("刺{}。", subject));
        let mut task = ReviewTask::from_candidate(
            id,
            &ReviewCandidate {
                subject: subject.to_string(),
                priority: Priority::Medium,
                reason,
                reported: Default::default(),
            },
            &doc,
            &[],
        );
        task.record(TaskDecision::new(label, "reviewer", "2025-01-01 00:00:00"));
        task
    }

    #[test]
    fn test_merge_is_idempotent() {
        let tasks = vec![
            reviewed(1, "风府", ReviewReason::TypeConflict, ReviewLabel::Type(EntityType::Acupoint)),
            reviewed(2, "内关", ReviewReason::SingleModel, ReviewLabel::Invalid),
        ];
        let mut store = ReviewSnapshot::default();
        let first = store.merge(&tasks);
        assert_eq!(first.added, 2);
        let after_first = store.clone();

        let second = store.merge(&tasks);
        assert_eq!(second.added, 0);
        assert_eq!(second.unchanged, 2);
        assert_eq!(store, after_first);
    }

    #[test]
    fn test_merge_last_writer_wins() {
        let mut store = ReviewSnapshot::default();
        store.merge(&[reviewed(
            1,
            "风府",
            ReviewReason::TypeConflict,
            ReviewLabel::Type(EntityType::Treatment),
        )]);
        let summary = store.merge(&[reviewed(
            5,
            "风府",
            ReviewReason::TypeConflict,
            ReviewLabel::Type(EntityType::Acupoint),
        )]);
        assert_eq!(summary.updated, 1);
        let decision = store.lookup("风府").unwrap();
        assert_eq!(decision.label, ReviewLabel::Type(EntityType::Acupoint));
        assert_eq!(decision.task_id, 5);
    }

    #[test]
    fn test_merge_ignores_pending_tasks() {
        let mut task = reviewed(1, "风府", ReviewReason::TypeConflict, ReviewLabel::Invalid);
        task.decision = None;
        let mut store = ReviewSnapshot::default();
        let summary = store.merge(&[task]);
        assert_eq!(summary.ignored_pending, 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_statistics() {
        let mut store = ReviewSnapshot::default();
        store.merge(&[
            reviewed(1, "风府", ReviewReason::TypeConflict, ReviewLabel::Type(EntityType::Acupoint)),
            reviewed(2, "内关", ReviewReason::SingleModel, ReviewLabel::Type(EntityType::Acupoint)),
            reviewed(3, "胸", ReviewReason::SingleModel, ReviewLabel::Invalid),
        ]);
        let stats = store.statistics();
        assert_eq!(stats.total_reviewed, 3);
        assert_eq!(stats.confirmed_entities, 2);
        assert_eq!(stats.rejected_entities, 1);
        assert_eq!(stats.type_corrections, 1);
    }
}
