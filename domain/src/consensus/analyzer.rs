//! Consensus analysis over per-source results
//!
//! The analyzer runs after a full barrier: every source call for the
//! document has either returned or failed. Failed sources count toward
//! neither the support of any key nor the tier denominator.

use super::group::{ConflictRecord, EntityGroup, RelationGroup};
use super::tier::{AgreementTier, TierCounts};
use crate::annotation::{
    EntityKey, EntityType, MalformedCounts, RelationKey, SourceExtraction, validate_entities,
    validate_relations,
};
use crate::core::source::{ReliabilityTable, SourceId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Result of one source call for one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SourceOutcome {
    Success {
        source: SourceId,
        extraction: SourceExtraction,
    },
    Failure {
        source: SourceId,
        error: String,
    },
}

impl SourceOutcome {
    pub fn success(source: impl Into<SourceId>, extraction: SourceExtraction) -> Self {
        SourceOutcome::Success {
            source: source.into(),
            extraction,
        }
    }

    pub fn failure(source: impl Into<SourceId>, error: impl Into<String>) -> Self {
        SourceOutcome::Failure {
            source: source.into(),
            error: error.into(),
        }
    }

    pub fn source(&self) -> &SourceId {
        match self {
            SourceOutcome::Success { source, .. } | SourceOutcome::Failure { source, .. } => source,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SourceOutcome::Success { .. })
    }
}

/// Everything the analyzer derived for one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsensusAnalysis {
    /// Sources that returned successfully (the tier denominator)
    pub successful_sources: BTreeSet<SourceId>,
    /// Sources that errored or timed out, with their error text
    pub failed_sources: BTreeMap<SourceId, String>,
    /// Entity groups ordered by canonical key
    pub entity_groups: Vec<EntityGroup>,
    /// Relation groups ordered by canonical key
    pub relation_groups: Vec<RelationGroup>,
    /// Texts reported under two or more types, ordered by text
    pub conflicts: Vec<ConflictRecord>,
    /// Observations dropped during validation
    pub malformed: MalformedCounts,
}

impl ConsensusAnalysis {
    /// Number of sources that returned successfully
    pub fn total_sources(&self) -> usize {
        self.successful_sources.len()
    }

    /// No source succeeded: the document is unprocessed, not empty
    pub fn is_empty_run(&self) -> bool {
        self.successful_sources.is_empty()
    }

    pub fn is_conflict_text(&self, text: &str) -> bool {
        self.conflicts
            .binary_search_by(|c| c.text.as_str().cmp(text))
            .is_ok()
    }

    pub fn conflict(&self, text: &str) -> Option<&ConflictRecord> {
        self.conflicts
            .binary_search_by(|c| c.text.as_str().cmp(text))
            .ok()
            .map(|i| &self.conflicts[i])
    }

    /// Entity groups in a tier, excluding texts under conflict
    pub fn entities_in_tier(&self, tier: AgreementTier) -> impl Iterator<Item = &EntityGroup> {
        self.entity_groups
            .iter()
            .filter(move |g| g.tier == tier && !self.is_conflict_text(g.text()))
    }

    pub fn relations_in_tier(&self, tier: AgreementTier) -> impl Iterator<Item = &RelationGroup> {
        self.relation_groups.iter().filter(move |g| g.tier == tier)
    }

    /// Tier counts over entity keys, plus the conflict count
    pub fn entity_tier_counts(&self) -> TierCounts {
        let mut counts = TierCounts {
            conflicts: self.conflicts.len(),
            ..Default::default()
        };
        for group in &self.entity_groups {
            counts.record(group.tier);
        }
        counts
    }

    pub fn relation_tier_counts(&self) -> TierCounts {
        let mut counts = TierCounts::default();
        for group in &self.relation_groups {
            counts.record(group.tier);
        }
        counts
    }
}

/// Groups observations by canonical key and classifies agreement
pub struct ConsensusAnalyzer<'a> {
    table: &'a ReliabilityTable,
}

impl<'a> ConsensusAnalyzer<'a> {
    pub fn new(table: &'a ReliabilityTable) -> Self {
        Self { table }
    }

    /// Analyze all source outcomes for one document.
    ///
    /// A source listed more than once contributes a single vote per key.
    pub fn analyze(&self, document: &str, outcomes: &[SourceOutcome]) -> ConsensusAnalysis {
        let mut analysis = ConsensusAnalysis::default();
        let mut successes: Vec<(&SourceId, &SourceExtraction)> = Vec::new();

        for outcome in outcomes {
            match outcome {
                SourceOutcome::Success { source, extraction } => {
                    analysis.successful_sources.insert(source.clone());
                    successes.push((source, extraction));
                }
                SourceOutcome::Failure { source, error } => {
                    analysis
                        .failed_sources
                        .insert(source.clone(), error.clone());
                }
            }
        }

        if successes.is_empty() {
            return analysis;
        }

        // A source that both failed and succeeded (duplicate listing) counts as successful.
        for source in &analysis.successful_sources {
            analysis.failed_sources.remove(source);
        }

        let total = analysis.successful_sources.len();

        // Entities
        let mut entity_votes: BTreeMap<EntityKey, BTreeSet<SourceId>> = BTreeMap::new();
        for (source, extraction) in &successes {
            let (observations, malformed) =
                validate_entities(document, source, &extraction.entities);
            analysis.malformed.absorb(malformed);
            for observation in observations {
                entity_votes
                    .entry(observation.key)
                    .or_default()
                    .insert(observation.source);
            }
        }

        // Relations, validated against every entity text seen for the document
        let known_texts: BTreeSet<String> =
            entity_votes.keys().map(|k| k.text.clone()).collect();
        let mut relation_votes: BTreeMap<RelationKey, BTreeSet<SourceId>> = BTreeMap::new();
        for (source, extraction) in &successes {
            let (observations, malformed) =
                validate_relations(&known_texts, source, &extraction.relations);
            analysis.malformed.absorb(malformed);
            for observation in observations {
                relation_votes
                    .entry(observation.key)
                    .or_default()
                    .insert(observation.source);
            }
        }

        // Conflicts: text -> type -> sources
        let mut by_text: BTreeMap<String, BTreeMap<EntityType, BTreeSet<SourceId>>> =
            BTreeMap::new();
        for (key, sources) in &entity_votes {
            by_text
                .entry(key.text.clone())
                .or_default()
                .insert(key.entity_type, sources.clone());
        }
        analysis.conflicts = by_text
            .into_iter()
            .filter(|(_, assignments)| assignments.len() >= 2)
            .map(|(text, assignments)| ConflictRecord { text, assignments })
            .collect();

        analysis.entity_groups = entity_votes
            .into_iter()
            .map(|(key, sources)| EntityGroup::new(key, sources, total, self.table))
            .collect();
        analysis.relation_groups = relation_votes
            .into_iter()
            .map(|(key, sources)| RelationGroup::new(key, sources, total, self.table))
            .collect();

        analysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{RawEntity, RawRelation, RelationType};

    fn table() -> ReliabilityTable {
        ReliabilityTable::from_pairs([("a", 3), ("b", 2), ("c", 1)])
    }

    fn entities(items: &[(&str, &str)]) -> SourceExtraction {
        SourceExtraction::entities_only(
            items.iter().map(|(t, ty)| RawEntity::new(*t, *ty)).collect(),
        )
    }

    #[test]
    fn test_unanimous_when_all_sources_agree() {
        let doc = "头痛。身热。";
        let outcomes = vec![
            SourceOutcome::success("a", entities(&[("头痛", "症状")])),
            SourceOutcome::success("b", entities(&[("头痛", "症状")])),
            SourceOutcome::success("c", entities(&[("头痛", "症状")])),
        ];
        let analysis = ConsensusAnalyzer::new(&table()).analyze(doc, &outcomes);

        assert_eq!(analysis.entity_groups.len(), 1);
        assert_eq!(analysis.entity_groups[0].tier, AgreementTier::Unanimous);
        assert_eq!(analysis.entity_groups[0].support(), 3);
        assert!(analysis.conflicts.is_empty());
    }

    #[test]
    fn test_conflict_detected_with_breakdown() {
        let doc = "热病刺风府。";
        let outcomes = vec![
            SourceOutcome::success("a", entities(&[("风府", "穴位")])),
            SourceOutcome::success("b", entities(&[("风府", "治法")])),
        ];
        let analysis = ConsensusAnalyzer::new(&table()).analyze(doc, &outcomes);

        assert_eq!(analysis.conflicts.len(), 1);
        let conflict = analysis.conflict("风府").unwrap();
        assert_eq!(conflict.assignments.len(), 2);
        assert!(analysis.is_conflict_text("风府"));
        assert_eq!(analysis.entities_in_tier(AgreementTier::Disputed).count(), 0);
        assert_eq!(analysis.entity_tier_counts().conflicts, 1);
    }

    #[test]
    fn test_failed_source_excluded_from_denominator() {
        let doc = "头痛。";
        let outcomes = vec![
            SourceOutcome::success("a", entities(&[("头痛", "症状")])),
            SourceOutcome::success("b", entities(&[("头痛", "症状")])),
            SourceOutcome::failure("c", "timeout"),
        ];
        let analysis = ConsensusAnalyzer::new(&table()).analyze(doc, &outcomes);

        assert_eq!(analysis.total_sources(), 2);
        assert_eq!(analysis.entity_groups[0].tier, AgreementTier::Unanimous);
        assert_eq!(analysis.failed_sources.get(&"c".into()).unwrap(), "timeout");
    }

    #[test]
    fn test_all_sources_failed_is_empty_run() {
        let outcomes = vec![
            SourceOutcome::failure("a", "boom"),
            SourceOutcome::failure("b", "boom"),
        ];
        let analysis = ConsensusAnalyzer::new(&table()).analyze("头痛。", &outcomes);

        assert!(analysis.is_empty_run());
        assert!(analysis.entity_groups.is_empty());
        assert_eq!(analysis.failed_sources.len(), 2);
    }

    #[test]
    fn test_duplicate_votes_from_one_source_count_once() {
        let doc = "头痛。";
        let outcomes = vec![
            SourceOutcome::success("a", entities(&[("头痛", "症状"), ("头痛", "症状")])),
            SourceOutcome::success("b", SourceExtraction::default()),
            SourceOutcome::success("c", SourceExtraction::default()),
        ];
        let analysis = ConsensusAnalyzer::new(&table()).analyze(doc, &outcomes);

        assert_eq!(analysis.entity_groups[0].support(), 1);
        assert_eq!(analysis.entity_groups[0].tier, AgreementTier::Disputed);
    }

    #[test]
    fn test_support_never_exceeds_successful_sources() {
        let doc = "头痛，身热。";
        let outcomes = vec![
            SourceOutcome::success("a", entities(&[("头痛", "症状"), ("身热", "症状")])),
            SourceOutcome::success("a", entities(&[("头痛", "症状")])),
            SourceOutcome::success("b", entities(&[("头痛", "症状")])),
        ];
        let analysis = ConsensusAnalyzer::new(&table()).analyze(doc, &outcomes);

        for group in &analysis.entity_groups {
            assert!(group.support() <= analysis.total_sources());
        }
        assert_eq!(analysis.total_sources(), 2);
    }

    #[test]
    fn test_relations_grouped_and_malformed_counted() {
        let doc = "头痛，刺百会。";
        let extraction = SourceExtraction::new(
            vec![
                RawEntity::new("头痛", "症状"),
                RawEntity::new("百会", "穴位"),
                RawEntity::new("腹痛", "症状"),
            ],
            vec![
                RawRelation::new("百会", "TREAT", "头痛"),
                RawRelation::new("百会", "TREAT", "腹痛"),
            ],
        );
        let outcomes = vec![
            SourceOutcome::success("a", extraction.clone()),
            SourceOutcome::success("b", extraction),
        ];
        let analysis = ConsensusAnalyzer::new(&table()).analyze(doc, &outcomes);

        assert_eq!(analysis.relation_groups.len(), 1);
        let group = &analysis.relation_groups[0];
        assert_eq!(group.key.relation, RelationType::Treat);
        assert_eq!(group.tier, AgreementTier::Unanimous);
        // 腹痛 missing twice, dangling relation twice
        assert_eq!(analysis.malformed.entity_text_not_found, 2);
        assert_eq!(analysis.malformed.dangling_relation, 2);
        assert_eq!(analysis.relation_tier_counts().unanimous, 1);
    }

    #[test]
    fn test_lone_successful_source_is_disputed() {
        let outcomes = vec![
            SourceOutcome::failure("a", "timeout"),
            SourceOutcome::success("c", entities(&[("头痛", "症状")])),
        ];
        let analysis = ConsensusAnalyzer::new(&table()).analyze("头痛。", &outcomes);

        assert_eq!(analysis.total_sources(), 1);
        assert_eq!(analysis.entity_groups[0].tier, AgreementTier::Disputed);
        assert_eq!(analysis.entity_tier_counts().unanimous, 0);
    }

    #[test]
    fn test_groups_are_ordered_by_key() {
        let doc = "身热头痛。";
        let outcomes = vec![SourceOutcome::success(
            "a",
            entities(&[("身热", "症状"), ("头痛", "症状")]),
        )];
        let analysis = ConsensusAnalyzer::new(&table()).analyze(doc, &outcomes);
        let texts: Vec<_> = analysis.entity_groups.iter().map(|g| g.text()).collect();
        let mut sorted = texts.clone();
        sorted.sort();
        assert_eq!(texts, sorted);
    }
}
