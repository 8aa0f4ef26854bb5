//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No extraction sources configured")]
    NoSources,

    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    #[error("Unknown relation type: {0}")]
    UnknownRelationType(String),

    #[error("Unknown review label: {0}")]
    UnknownReviewLabel(String),

    #[error("Invalid reliability rank for source {source_id}: {rank}")]
    InvalidRank { source_id: String, rank: u32 },

    #[error("Review task not found: {0}")]
    TaskNotFound(u64),

    #[error("Review task {0} already has a decision")]
    TaskAlreadyReviewed(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_errors_display() {
        assert_eq!(
            DomainError::TaskNotFound(4).to_string(),
            "Review task not found: 4"
        );
        assert_eq!(
            DomainError::TaskAlreadyReviewed(4).to_string(),
            "Review task 4 already has a decision"
        );
    }

    #[test]
    fn test_invalid_rank_display() {
        let error = DomainError::InvalidRank {
            source_id: "tongyi".to_string(),
            rank: 0,
        };
        assert_eq!(
            error.to_string(),
            "Invalid reliability rank for source tongyi: 0"
        );
    }
}
