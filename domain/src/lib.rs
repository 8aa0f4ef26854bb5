//! Domain layer for annotation-quorum
//!
//! This crate contains the reconciliation logic: value types, consensus,
//! resolution and tagging. It performs no I/O and has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Quorum over extraction sources
//!
//! Several independent sources annotate the same document. Their outputs
//! are grouped by canonical key and classified into agreement tiers:
//!
//! - **Unanimous**: every successful source agrees
//! - **Majority**: two or more, but not all
//! - **Disputed**: a single source
//!
//! Texts reported under different types are **conflicts**.
//!
//! ## Human review
//!
//! Conflicts and the most promising disputed entities become review tasks.
//! Decisions land in a durable review store and take precedence on the next
//! resolution of disputed and conflicting items.
//!
//! ## Export
//!
//! Final entities are projected onto characters as BIO tags.

pub mod annotation;
pub mod consensus;
pub mod core;
pub mod resolution;
pub mod review;
pub mod span;
pub mod tagging;

// Re-export commonly used types
pub use annotation::{
    Document, EntityKey, EntityType, MalformedCounts, RawEntity, RawRelation, RelationKey,
    RelationType, SourceExtraction,
};
pub use consensus::{
    AgreementTier, ConflictRecord, ConsensusAnalysis, ConsensusAnalyzer, EntityGroup,
    RelationGroup, SourceOutcome, TierCounts,
};
pub use core::{
    confidence::Confidence,
    error::DomainError,
    source::{ReliabilityTable, SourceId},
};
pub use resolution::{FinalEntity, FinalRelation, FinalResolver, Provenance, order_for_tagging};
pub use review::{
    DEFAULT_REVIEW_CAP, MergeSummary, NOT_RECOGNIZED, Priority, ReviewCandidate, ReviewLabel,
    ReviewLookup, ReviewQueueState, ReviewReason, ReviewReport, ReviewSnapshot, ReviewStatistics, ReviewTask,
    StoredDecision, TaskContext, TaskDecision, select_candidates, sort_for_review,
};
pub use span::{ContextWindow, Span, context_for, full_sentence, locate, locate_all, sentence_window};
pub use tagging::{BioChar, Tag, TaggingExport, TaggingStatistics, to_char_tags};
