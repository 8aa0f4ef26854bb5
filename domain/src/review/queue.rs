//! Review queue content
//!
//! Pure state shared by every queue adapter. Ids come from `next_id`, which
//! only ever grows, so an id is never handed out twice even after tasks are
//! removed and the queue is reloaded.

use super::task::{ReviewTask, TaskDecision, sort_for_review};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewQueueState {
    pub next_id: u64,
    #[serde(default)]
    pub tasks: Vec<ReviewTask>,
}

impl Default for ReviewQueueState {
    fn default() -> Self {
        Self {
            next_id: 1,
            tasks: Vec::new(),
        }
    }
}

impl ReviewQueueState {
    /// Tasks still waiting for a decision, in presentation order
    pub fn pending(&self, stale_threshold: u32) -> Vec<ReviewTask> {
        let mut pending: Vec<_> = self.tasks.iter().filter(|t| t.is_pending()).cloned().collect();
        sort_for_review(&mut pending, stale_threshold);
        pending
    }

    pub fn pending_subjects(&self) -> BTreeSet<String> {
        self.tasks
            .iter()
            .filter(|t| t.is_pending())
            .map(|t| t.subject.clone())
            .collect()
    }

    /// Add tasks, assigning fresh ids.
    ///
    /// A task whose subject is already queued is skipped. Returns the tasks
    /// actually accepted, with their ids.
    pub fn enqueue(&mut self, tasks: Vec<ReviewTask>) -> Vec<ReviewTask> {
        let mut queued: BTreeSet<String> = self.tasks.iter().map(|t| t.subject.clone()).collect();
        let mut accepted = Vec::new();
        for mut task in tasks {
            if !queued.insert(task.subject.clone()) {
                continue;
            }
            task.id = self.next_id;
            self.next_id += 1;
            self.tasks.push(task.clone());
            accepted.push(task);
        }
        accepted
    }

    fn find_pending_mut(&mut self, id: u64) -> Result<&mut ReviewTask, DomainError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(DomainError::TaskNotFound(id))?;
        if task.is_reviewed() {
            return Err(DomainError::TaskAlreadyReviewed(id));
        }
        Ok(task)
    }

    pub fn record_decision(&mut self, id: u64, decision: TaskDecision) -> Result<ReviewTask, DomainError> {
        let task = self.find_pending_mut(id)?;
        task.record(decision);
        Ok(task.clone())
    }

    pub fn skip(&mut self, id: u64) -> Result<ReviewTask, DomainError> {
        let task = self.find_pending_mut(id)?;
        task.skip();
        Ok(task.clone())
    }

    /// Reviewed tasks, left in place
    pub fn completed(&self) -> Vec<ReviewTask> {
        self.tasks.iter().filter(|t| t.is_reviewed()).cloned().collect()
    }

    /// Remove and return the reviewed tasks among `ids`
    ///
    /// Pending tasks and reviewed tasks outside `ids` stay queued.
    pub fn remove_completed(&mut self, ids: &BTreeSet<u64>) -> Vec<ReviewTask> {
        let (done, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|t| t.is_reviewed() && ids.contains(&t.id));
        self.tasks = kept;
        done
    }

    /// Pending tasks skipped at least `threshold` times
    pub fn stale(&self, threshold: u32) -> Vec<ReviewTask> {
        self.tasks
            .iter()
            .filter(|t| t.is_pending() && t.is_stale(threshold))
            .cloned()
            .collect()
    }
}
