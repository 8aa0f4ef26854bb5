//! Consensus over independent extraction sources
//!
//! # Core Concepts
//!
//! ## Consensus Group
//! One canonical key and the set of sources that reported it. A source
//! voting twice for the same key counts once.
//!
//! ## Agreement Tier
//! `unanimous` / `majority` / `disputed`, derived from support relative to
//! the sources that succeeded for the document.
//!
//! ## Conflict
//! The same text reported under two or more entity types. Conflicts are
//! resolved only through the conflict path, never as plain tiered entities.
//!
//! ```text
//! source A ─┐
//! source B ─┼─▶ validate ─▶ group by key ─▶ classify tier ─▶ ConsensusAnalysis
//! source C ─┘                    │
//!                                └─▶ text → {type → sources} ─▶ conflicts
//! ```

pub mod analyzer;
pub mod group;
pub mod tier;

pub use analyzer::{ConsensusAnalysis, ConsensusAnalyzer, SourceOutcome};
pub use group::{ConflictRecord, ConsensusGroup, EntityGroup, RelationGroup};
pub use tier::{AgreementTier, TierCounts};
