//! Final resolution over an analyzed document
//!
//! # Entity precedence (first match wins, per canonical key)
//!
//! | Rule | Condition                       | Result                                    |
//! |------|---------------------------------|-------------------------------------------|
//! | 0    | reviewer labeled text invalid   | dropped, any tier                         |
//! | 1    | unanimous                       | high, `unanimous`                         |
//! | 2    | majority                        | high/medium/low by best supporter rank    |
//! | 3    | disputed                        | review label, or top source -> medium     |
//! | 4    | conflict text                   | review label, or best rank profile -> low |
//!
//! Keys whose text is a conflict are only handled by rule 4.

use super::entities::{FinalEntity, FinalRelation, Provenance};
use crate::annotation::{EntityType, RelationKey};
use crate::consensus::{AgreementTier, ConsensusAnalysis, EntityGroup, RelationGroup};
use crate::core::confidence::Confidence;
use crate::core::source::{ReliabilityTable, SourceId};
use crate::review::{ReviewLabel, ReviewLookup};
use std::collections::BTreeSet;

pub struct FinalResolver<'a> {
    table: &'a ReliabilityTable,
}

impl<'a> FinalResolver<'a> {
    pub fn new(table: &'a ReliabilityTable) -> Self {
        Self { table }
    }

    /// Resolve entities. Output is sorted by (provenance, text, type), so
    /// repeated runs over the same input are identical.
    pub fn resolve_entities(
        &self,
        analysis: &ConsensusAnalysis,
        reviews: &dyn ReviewLookup,
    ) -> Vec<FinalEntity> {
        let mut resolved = Vec::new();

        for group in &analysis.entity_groups {
            if analysis.is_conflict_text(group.text()) {
                continue;
            }
            if let Some(entity) = self.resolve_group(group, reviews) {
                resolved.push(entity);
            }
        }

        for conflict in &analysis.conflicts {
            match reviews.lookup(&conflict.text).map(|d| (d.label, d.confidence)) {
                Some((ReviewLabel::Invalid, _)) => continue,
                Some((ReviewLabel::Type(entity_type), confidence)) => {
                    let sources = conflict
                        .assignments
                        .get(&entity_type)
                        .cloned()
                        .unwrap_or_default();
                    resolved.push(self.entity(
                        &conflict.text,
                        entity_type,
                        confidence,
                        Provenance::ConflictResolved,
                        sources,
                    ));
                }
                None => {
                    if let Some((entity_type, sources)) = conflict.preferred_type(self.table) {
                        resolved.push(self.entity(
                            &conflict.text,
                            entity_type,
                            Confidence::Low,
                            Provenance::ConflictAutoResolved,
                            sources.clone(),
                        ));
                    }
                }
            }
        }

        resolved.sort_by(|a, b| {
            a.provenance
                .cmp(&b.provenance)
                .then_with(|| a.text.cmp(&b.text))
                .then_with(|| a.entity_type.cmp(&b.entity_type))
        });
        resolved
    }

    fn resolve_group(&self, group: &EntityGroup, reviews: &dyn ReviewLookup) -> Option<FinalEntity> {
        let review = reviews.lookup(group.text());
        if review.as_ref().is_some_and(|d| d.label.is_invalid()) {
            return None;
        }

        let (entity_type, confidence, provenance) = match group.tier {
            AgreementTier::Unanimous => (group.entity_type(), Confidence::High, Provenance::Unanimous),
            AgreementTier::Majority => {
                (group.entity_type(), self.majority_confidence(group), Provenance::Majority)
            }
            AgreementTier::Disputed => match review {
                Some(decision) => {
                    let entity_type = decision.label.entity_type()?;
                    (entity_type, decision.confidence, Provenance::HumanReviewed)
                }
                None => {
                    let source = group.sole_supporter()?;
                    if !self.table.is_top(source) {
                        return None;
                    }
                    (group.entity_type(), Confidence::Medium, Provenance::SingleSourceTrusted)
                }
            },
        };

        Some(self.entity(
            group.text(),
            entity_type,
            confidence,
            provenance,
            group.supporters.clone(),
        ))
    }

    fn majority_confidence(&self, group: &EntityGroup) -> Confidence {
        if group.supporters.iter().any(|s| self.table.is_top(s)) {
            Confidence::High
        } else if group.supporters.iter().any(|s| self.table.is_second(s)) {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    fn entity(
        &self,
        text: &str,
        entity_type: EntityType,
        confidence: Confidence,
        provenance: Provenance,
        sources: BTreeSet<SourceId>,
    ) -> FinalEntity {
        FinalEntity {
            text: text.to_string(),
            entity_type,
            confidence,
            provenance,
            reliability_score: self.table.score(&sources),
            sources,
        }
    }

    /// Resolve relations. Relations have no review override.
    pub fn resolve_relations(&self, analysis: &ConsensusAnalysis) -> Vec<FinalRelation> {
        analysis
            .relation_groups
            .iter()
            .filter_map(|group| self.resolve_relation(group))
            .collect()
    }

    fn resolve_relation(&self, group: &RelationGroup) -> Option<FinalRelation> {
        let (confidence, provenance) = match group.tier {
            AgreementTier::Unanimous => (Confidence::High, Provenance::Unanimous),
            AgreementTier::Majority => (Confidence::Medium, Provenance::Majority),
            AgreementTier::Disputed => {
                let source = group.sole_supporter()?;
                if !self.table.is_top(source) {
                    return None;
                }
                (Confidence::Low, Provenance::SingleSourceTrusted)
            }
        };
        let RelationKey {
            head,
            relation,
            tail,
        } = &group.key;
        Some(FinalRelation {
            head: head.clone(),
            relation: *relation,
            tail: tail.clone(),
            confidence,
            provenance,
            sources: group.supporters.clone(),
            reliability_score: group.reliability_score,
        })
    }
}

/// Order entities for tagging: longer text first, then higher confidence.
///
/// The sort is stable, so equal entities keep their resolved order.
pub fn order_for_tagging(entities: &[FinalEntity]) -> Vec<FinalEntity> {
    let mut ordered = entities.to_vec();
    ordered.sort_by(|a, b| {
        b.char_len()
            .cmp(&a.char_len())
            .then_with(|| b.confidence.cmp(&a.confidence))
    });
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Document, RawEntity, RawRelation, RelationType, SourceExtraction};
    use crate::consensus::{ConsensusAnalyzer, SourceOutcome};
    use crate::review::{
        Priority, ReviewCandidate, ReviewReason, ReviewSnapshot, ReviewTask, TaskDecision,
    };

    const DOC: &str = "热病头痛，刺风府。卒心痛，取内关。身热汗出，灸大椎。";

    fn table() -> ReliabilityTable {
        ReliabilityTable::from_pairs([("a", 3), ("b", 2), ("c", 1)])
    }

    fn entities(pairs: &[(&str, &str)]) -> SourceExtraction {
        SourceExtraction::entities_only(pairs.iter().map(|(t, l)| RawEntity::new(*t, *l)).collect())
    }

    fn analyze(outcomes: &[SourceOutcome]) -> ConsensusAnalysis {
        let table = table();
        ConsensusAnalyzer::new(&table).analyze(DOC, outcomes)
    }

    fn store_with(subject: &str, reason: ReviewReason, label: ReviewLabel) -> ReviewSnapshot {
        let doc = Document::new("卷一", DOC);
        let mut task = ReviewTask::from_candidate(
            1,
            &ReviewCandidate {
                subject: subject.to_string(),
                priority: Priority::Medium,
                reason,
                reported: Default::default(),
            },
            &doc,
            &[],
        );
        task.record(TaskDecision::new(label, "r", "t").with_confidence(Confidence::Medium));
        let mut store = ReviewSnapshot::default();
        store.merge(&[task]);
        store
    }

    fn find<'e>(resolved: &'e [FinalEntity], text: &str) -> Option<&'e FinalEntity> {
        resolved.iter().find(|e| e.text == text)
    }

    #[test]
    fn test_unanimous_is_high() {
        let analysis = analyze(&[
            SourceOutcome::success("a", entities(&[("头痛", "症状")])),
            SourceOutcome::success("b", entities(&[("头痛", "症状")])),
            SourceOutcome::success("c", entities(&[("头痛", "症状")])),
        ]);
        let table = table();
        let resolved = FinalResolver::new(&table).resolve_entities(&analysis, &ReviewSnapshot::default());
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].confidence, Confidence::High);
        assert_eq!(resolved[0].provenance, Provenance::Unanimous);
        assert!((resolved[0].reliability_score - 6.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_conflict_auto_resolves_to_higher_ranked_type() {
        let analysis = analyze(&[
            SourceOutcome::success("a", entities(&[("风府", "穴位")])),
            SourceOutcome::success("b", entities(&[("风府", "治法")])),
            SourceOutcome::success("c", entities(&[])),
        ]);
        let table = table();
        let resolved = FinalResolver::new(&table).resolve_entities(&analysis, &ReviewSnapshot::default());
        assert_eq!(resolved.len(), 1);
        let entity = &resolved[0];
        assert_eq!(entity.entity_type, EntityType::Acupoint);
        assert_eq!(entity.confidence, Confidence::Low);
        assert_eq!(entity.provenance, Provenance::ConflictAutoResolved);
    }

    #[test]
    fn test_conflict_review_decision_wins() {
        let analysis = analyze(&[
            SourceOutcome::success("a", entities(&[("风府", "穴位")])),
            SourceOutcome::success("b", entities(&[("风府", "治法")])),
        ]);
        let table = table();
        let store = store_with(
            "风府",
            ReviewReason::TypeConflict,
            ReviewLabel::Type(EntityType::Treatment),
        );
        let resolved = FinalResolver::new(&table).resolve_entities(&analysis, &store);
        assert_eq!(resolved[0].entity_type, EntityType::Treatment);
        assert_eq!(resolved[0].provenance, Provenance::ConflictResolved);
        assert_eq!(resolved[0].confidence, Confidence::Medium);
        assert_eq!(resolved[0].sources, BTreeSet::from(["b".into()]));
    }

    #[test]
    fn test_disputed_low_rank_omitted_unless_reviewed() {
        let outcomes = [
            SourceOutcome::success("a", entities(&[])),
            SourceOutcome::success("b", entities(&[])),
            SourceOutcome::success("c", entities(&[("卒心痛", "症状")])),
        ];
        let analysis = analyze(&outcomes);
        let table = table();
        let resolver = FinalResolver::new(&table);
        assert!(resolver.resolve_entities(&analysis, &ReviewSnapshot::default()).is_empty());

        let store = store_with(
            "卒心痛",
            ReviewReason::SingleModel,
            ReviewLabel::Type(EntityType::Disease),
        );
        let resolved = resolver.resolve_entities(&analysis, &store);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].entity_type, EntityType::Disease);
        assert_eq!(resolved[0].provenance, Provenance::HumanReviewed);
    }

    #[test]
    fn test_disputed_top_source_trusted() {
        let analysis = analyze(&[
            SourceOutcome::success("a", entities(&[("大椎", "穴位")])),
            SourceOutcome::success("b", entities(&[])),
        ]);
        let table = table();
        let resolved = FinalResolver::new(&table).resolve_entities(&analysis, &ReviewSnapshot::default());
        assert_eq!(resolved[0].confidence, Confidence::Medium);
        assert_eq!(resolved[0].provenance, Provenance::SingleSourceTrusted);
    }

    #[test]
    fn test_majority_confidence_follows_best_supporter() {
        let analysis = analyze(&[
            SourceOutcome::success("a", entities(&[("头痛", "症状")])),
            SourceOutcome::success("b", entities(&[("头痛", "症状"), ("内关", "穴位")])),
            SourceOutcome::success("c", entities(&[("头痛", "症状"), ("内关", "穴位")])),
            SourceOutcome::success("d", entities(&[("大椎", "穴位"), ("汗出", "症状")])),
            SourceOutcome::success("e", entities(&[("汗出", "症状")])),
        ]);
        let table = ReliabilityTable::from_pairs([("a", 3), ("b", 2), ("c", 1), ("d", 0), ("e", 0)]);
        let resolved = FinalResolver::new(&table).resolve_entities(&analysis, &ReviewSnapshot::default());
        assert_eq!(find(&resolved, "头痛").unwrap().confidence, Confidence::High);
        assert_eq!(find(&resolved, "内关").unwrap().confidence, Confidence::Medium);
        assert_eq!(find(&resolved, "汗出").unwrap().confidence, Confidence::Low);
        assert!(find(&resolved, "大椎").is_none());
    }

    #[test]
    fn test_invalid_review_drops_any_tier() {
        let analysis = analyze(&[
            SourceOutcome::success("a", entities(&[("头痛", "症状")])),
            SourceOutcome::success("b", entities(&[("头痛", "症状")])),
        ]);
        let table = table();
        let store = store_with("头痛", ReviewReason::SingleModel, ReviewLabel::Invalid);
        assert!(FinalResolver::new(&table).resolve_entities(&analysis, &store).is_empty());
    }

    #[test]
    fn test_review_does_not_override_agreed_type() {
        let analysis = analyze(&[
            SourceOutcome::success("a", entities(&[("头痛", "症状")])),
            SourceOutcome::success("b", entities(&[("头痛", "症状")])),
        ]);
        let table = table();
        let store = store_with(
            "头痛",
            ReviewReason::SingleModel,
            ReviewLabel::Type(EntityType::Disease),
        );
        let resolved = FinalResolver::new(&table).resolve_entities(&analysis, &store);
        assert_eq!(resolved[0].entity_type, EntityType::Symptom);
        assert_eq!(resolved[0].provenance, Provenance::Unanimous);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let analysis = analyze(&[
            SourceOutcome::success("a", entities(&[("风府", "穴位"), ("大椎", "穴位"), ("头痛", "症状")])),
            SourceOutcome::success("b", entities(&[("风府", "治法"), ("头痛", "症状")])),
            SourceOutcome::success("c", entities(&[("卒心痛", "症状")])),
        ]);
        let table = table();
        let resolver = FinalResolver::new(&table);
        let store = ReviewSnapshot::default();
        let first = resolver.resolve_entities(&analysis, &store);
        let second = resolver.resolve_entities(&analysis, &store);
        assert_eq!(first, second);

        let order: Vec<_> = first.iter().map(|e| e.provenance).collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
    }

    #[test]
    fn test_relations() {
        let with_relations = |relations: Vec<RawRelation>| {
            SourceExtraction::new(
                vec![RawEntity::new("风府", "穴位"), RawEntity::new("头痛", "症状")],
                relations,
            )
        };
        let analysis = analyze(&[
            SourceOutcome::success(
                "a",
                with_relations(vec![
                    RawRelation::new("风府", "TREAT", "头痛"),
                    RawRelation::new("头痛", "MANIFEST", "风府"),
                ]),
            ),
            SourceOutcome::success("b", with_relations(vec![RawRelation::new("风府", "TREAT", "头痛")])),
            SourceOutcome::success(
                "c",
                with_relations(vec![RawRelation::new("风府", "MAIN_TREAT", "头痛")]),
            ),
        ]);
        let table = table();
        let relations = FinalResolver::new(&table).resolve_relations(&analysis);

        assert_eq!(relations.len(), 2);
        let treat = relations.iter().find(|r| r.relation == RelationType::Treat).unwrap();
        assert_eq!(treat.confidence, Confidence::Medium);
        assert_eq!(treat.provenance, Provenance::Majority);
        let manifest = relations.iter().find(|r| r.relation == RelationType::Manifest).unwrap();
        assert_eq!(manifest.provenance, Provenance::SingleSourceTrusted);
        assert!(!relations.iter().any(|r| r.relation == RelationType::MainTreat));
    }

    #[test]
    fn test_lone_low_ranked_source_yields_nothing() {
        let extraction = SourceExtraction::new(
            vec![RawEntity::new("头痛", "症状"), RawEntity::new("风府", "穴位")],
            vec![RawRelation::new("风府", "TREAT", "头痛")],
        );
        let analysis = analyze(&[
            SourceOutcome::failure("a", "timeout"),
            SourceOutcome::failure("b", "timeout"),
            SourceOutcome::success("c", extraction),
        ]);
        let table = table();
        let resolver = FinalResolver::new(&table);
        assert!(resolver.resolve_entities(&analysis, &ReviewSnapshot::default()).is_empty());
        assert!(resolver.resolve_relations(&analysis).is_empty());
    }

    #[test]
    fn test_order_for_tagging() {
        let entity = |text: &str, confidence| FinalEntity {
            text: text.to_string(),
            entity_type: EntityType::Symptom,
            confidence,
            provenance: Provenance::Unanimous,
            sources: BTreeSet::new(),
            reliability_score: 1.0,
        };
        let ordered = order_for_tagging(&[
            entity("厥阴", Confidence::High),
            entity("足厥阴", Confidence::Low),
            entity("头痛", Confidence::Low),
            entity("心痛", Confidence::High),
        ]);
        let texts: Vec<_> = ordered.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["足厥阴", "厥阴", "心痛", "头痛"]);
    }
}
