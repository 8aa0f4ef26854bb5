//! Final resolved annotations

use crate::annotation::{EntityType, RelationType};
use crate::core::confidence::Confidence;
use crate::core::source::SourceId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which resolution rule produced a final item
///
/// Declaration order is the output order of resolved entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Unanimous,
    Majority,
    HumanReviewed,
    SingleSourceTrusted,
    ConflictResolved,
    ConflictAutoResolved,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Unanimous => "unanimous",
            Provenance::Majority => "majority",
            Provenance::HumanReviewed => "human_reviewed",
            Provenance::SingleSourceTrusted => "single_source_trusted",
            Provenance::ConflictResolved => "conflict_resolved",
            Provenance::ConflictAutoResolved => "conflict_auto_resolved",
        }
    }

    pub fn is_reviewed(&self) -> bool {
        matches!(self, Provenance::HumanReviewed | Provenance::ConflictResolved)
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalEntity {
    pub text: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub confidence: Confidence,
    pub provenance: Provenance,
    pub sources: BTreeSet<SourceId>,
    pub reliability_score: f64,
}

impl FinalEntity {
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalRelation {
    pub head: String,
    pub relation: RelationType,
    pub tail: String,
    pub confidence: Confidence,
    pub provenance: Provenance,
    pub sources: BTreeSet<SourceId>,
    pub reliability_score: f64,
}
