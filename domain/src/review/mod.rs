//! Human review: candidate selection, tasks, stored decisions and reports

pub mod queue;
pub mod report;
pub mod selection;
pub mod store;
pub mod task;

pub use queue::ReviewQueueState;
pub use report::ReviewReport;
pub use selection::{DEFAULT_REVIEW_CAP, select_candidates};
pub use store::{MergeSummary, ReviewLookup, ReviewSnapshot, ReviewStatistics, StoredDecision};
pub use task::{
    NOT_RECOGNIZED, Priority, ReviewCandidate, ReviewLabel, ReviewReason, ReviewTask,
    TaskContext, TaskDecision, sort_for_review,
};
