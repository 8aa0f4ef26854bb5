//! Summary over a review session

use super::task::{Priority, ReviewLabel, ReviewReason, ReviewTask};
use crate::core::confidence::Confidence;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Invalid-label share above which extraction filtering should be tightened
pub const INVALID_RATIO_THRESHOLD: f64 = 0.3;

/// Aggregate view over reviewed and still-pending tasks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewReport {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub completion_rate: f64,
    pub label_counts: BTreeMap<String, usize>,
    pub confidence_counts: BTreeMap<Confidence, usize>,
    pub priority_counts: BTreeMap<Priority, usize>,
    pub reason_counts: BTreeMap<ReviewReason, usize>,
    pub recommendations: Vec<String>,
}

impl ReviewReport {
    /// Build a report; only tasks with a decision count as completed.
    pub fn build<'a>(tasks: impl IntoIterator<Item = &'a ReviewTask>) -> Self {
        let mut report = ReviewReport::default();
        let mut invalid = 0usize;
        let mut type_corrections = 0usize;

        for task in tasks {
            report.total_tasks += 1;
            let Some(decision) = &task.decision else {
                continue;
            };
            report.completed_tasks += 1;
            *report
                .label_counts
                .entry(decision.label.as_str().to_string())
                .or_default() += 1;
            *report.confidence_counts.entry(decision.confidence).or_default() += 1;
            *report.priority_counts.entry(task.priority).or_default() += 1;
            *report.reason_counts.entry(task.reason).or_default() += 1;

            match decision.label {
                ReviewLabel::Invalid => invalid += 1,
                ReviewLabel::Type(_) if task.reason == ReviewReason::TypeConflict => {
                    type_corrections += 1
                }
                ReviewLabel::Type(_) => {}
            }
        }

        if report.total_tasks > 0 {
            report.completion_rate = report.completed_tasks as f64 / report.total_tasks as f64;
        }

        if report.completed_tasks > 0
            && invalid as f64 > report.completed_tasks as f64 * INVALID_RATIO_THRESHOLD
        {
            report.recommendations.push(format!(
                "High invalid-entity ratio ({}/{}); tighten source filtering rules",
                invalid, report.completed_tasks
            ));
        }
        if type_corrections > 0 {
            report.recommendations.push(format!(
                "{} type conflict(s) settled by reviewers; revisit entity type definitions",
                type_corrections
            ));
        }
        report
    }
}
