//! Consensus groups and conflict records

use super::tier::AgreementTier;
use crate::annotation::{EntityKey, EntityType, RelationKey};
use crate::core::source::{ReliabilityTable, SourceId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One canonical key and the deduplicated set of sources supporting it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusGroup<K> {
    pub key: K,
    pub supporters: BTreeSet<SourceId>,
    pub tier: AgreementTier,
    pub reliability_score: f64,
}

impl<K> ConsensusGroup<K> {
    pub fn new(
        key: K,
        supporters: BTreeSet<SourceId>,
        total_sources: usize,
        table: &ReliabilityTable,
    ) -> Self {
        let tier = AgreementTier::classify(supporters.len(), total_sources);
        let reliability_score = table.score(&supporters);
        Self {
            key,
            supporters,
            tier,
            reliability_score,
        }
    }

    pub fn support(&self) -> usize {
        self.supporters.len()
    }

    /// The supporter when exactly one source supports the key
    pub fn sole_supporter(&self) -> Option<&SourceId> {
        if self.supporters.len() == 1 {
            self.supporters.iter().next()
        } else {
            None
        }
    }

    pub fn is_supported_by(&self, source: &SourceId) -> bool {
        self.supporters.contains(source)
    }
}

pub type EntityGroup = ConsensusGroup<EntityKey>;
pub type RelationGroup = ConsensusGroup<RelationKey>;

impl EntityGroup {
    pub fn text(&self) -> &str {
        &self.key.text
    }

    pub fn entity_type(&self) -> EntityType {
        self.key.entity_type
    }
}

/// Same text reported under two or more entity types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub text: String,
    /// Full type -> supporting sources breakdown
    pub assignments: BTreeMap<EntityType, BTreeSet<SourceId>>,
}

impl ConflictRecord {
    pub fn types(&self) -> impl Iterator<Item = &EntityType> {
        self.assignments.keys()
    }

    /// Type a given source assigned, if it saw the text at all.
    ///
    /// A source that voted for several types reports the first in type order.
    pub fn type_for(&self, source: &SourceId) -> Option<EntityType> {
        self.assignments
            .iter()
            .find(|(_, sources)| sources.contains(source))
            .map(|(t, _)| *t)
    }

    /// Type backed by the most reliable supporters.
    ///
    /// Each type's supporter ranks are sorted descending and compared
    /// lexicographically, so a tie on the top source is broken by the
    /// next-highest source. Remaining ties go to the earlier type.
    pub fn preferred_type(&self, table: &ReliabilityTable) -> Option<(EntityType, &BTreeSet<SourceId>)> {
        let mut best: Option<(EntityType, &BTreeSet<SourceId>, Vec<u32>)> = None;
        for (entity_type, sources) in &self.assignments {
            let profile = table.rank_profile(sources);
            let better = match &best {
                None => true,
                Some((_, _, best_profile)) => profile > *best_profile,
            };
            if better {
                best = Some((*entity_type, sources, profile));
            }
        }
        best.map(|(t, s, _)| (t, s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ReliabilityTable {
        ReliabilityTable::from_pairs([("a", 3), ("b", 2), ("c", 1)])
    }

    fn sources(ids: &[&str]) -> BTreeSet<SourceId> {
        ids.iter().map(|s| SourceId::from(*s)).collect()
    }

    #[test]
    fn test_group_tier_and_score() {
        let group = EntityGroup::new(
            EntityKey::new("头痛", EntityType::Symptom),
            sources(&["a", "b"]),
            3,
            &table(),
        );
        assert_eq!(group.tier, AgreementTier::Majority);
        assert_eq!(group.support(), 2);
        assert!((group.reliability_score - 5.0 / 6.0).abs() < 1e-9);
        assert!(group.sole_supporter().is_none());
    }

    #[test]
    fn test_sole_supporter() {
        let group = EntityGroup::new(
            EntityKey::new("卒心痛", EntityType::Symptom),
            sources(&["c"]),
            3,
            &table(),
        );
        assert_eq!(group.tier, AgreementTier::Disputed);
        assert_eq!(group.sole_supporter(), Some(&SourceId::from("c")));
    }

    #[test]
    fn test_preferred_type_follows_top_source() {
        let conflict = ConflictRecord {
            text: "风府".to_string(),
            assignments: BTreeMap::from([
                (EntityType::Acupoint, sources(&["a"])),
                (EntityType::Treatment, sources(&["b", "c"])),
            ]),
        };
        let (t, _) = conflict.preferred_type(&table()).unwrap();
        assert_eq!(t, EntityType::Acupoint);
    }

    #[test]
    fn test_preferred_type_tie_broken_by_next_source() {
        let conflict = ConflictRecord {
            text: "刺".to_string(),
            assignments: BTreeMap::from([
                (EntityType::Symptom, sources(&["a"])),
                (EntityType::Treatment, sources(&["a", "c"])),
            ]),
        };
        let (t, _) = conflict.preferred_type(&table()).unwrap();
        assert_eq!(t, EntityType::Treatment);
    }

    #[test]
    fn test_type_for_source() {
        let conflict = ConflictRecord {
            text: "风府".to_string(),
            assignments: BTreeMap::from([
                (EntityType::Acupoint, sources(&["a"])),
                (EntityType::Treatment, sources(&["b"])),
            ]),
        };
        assert_eq!(conflict.type_for(&"b".into()), Some(EntityType::Treatment));
        assert_eq!(conflict.type_for(&"c".into()), None);
    }
}
