//! Raw source output and its validation into typed observations
//!
//! Sources are black boxes. What they return is untrusted: labels are plain
//! strings and texts may not occur in the document at all. Validation keeps
//! what is well formed and counts what it drops.

use super::labels::{EntityType, RelationType};
use super::observation::{EntityObservation, RelationObservation};
use crate::core::source::SourceId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A document to reconcile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document name (file stem or title)
    pub name: String,
    /// Full source text
    pub text: String,
}

impl Document {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Entity as returned by a source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntity {
    pub text: String,
    #[serde(rename = "type")]
    pub entity_type: String,
}

impl RawEntity {
    pub fn new(text: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entity_type: entity_type.into(),
        }
    }
}

/// Relation as returned by a source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRelation {
    pub head: String,
    pub relation: String,
    pub tail: String,
}

impl RawRelation {
    pub fn new(
        head: impl Into<String>,
        relation: impl Into<String>,
        tail: impl Into<String>,
    ) -> Self {
        Self {
            head: head.into(),
            relation: relation.into(),
            tail: tail.into(),
        }
    }
}

/// Everything one source returned for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceExtraction {
    #[serde(default)]
    pub entities: Vec<RawEntity>,
    #[serde(default)]
    pub relations: Vec<RawRelation>,
}

impl SourceExtraction {
    pub fn new(entities: Vec<RawEntity>, relations: Vec<RawRelation>) -> Self {
        Self {
            entities,
            relations,
        }
    }

    pub fn entities_only(entities: Vec<RawEntity>) -> Self {
        Self::new(entities, Vec::new())
    }
}

/// Diagnostic counts of observations dropped during validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedCounts {
    /// Empty text or text not found verbatim in the document
    pub entity_text_not_found: usize,
    /// Entity label outside the known vocabulary
    pub unknown_entity_type: usize,
    /// Relation label outside the known vocabulary
    pub unknown_relation_type: usize,
    /// Relation head or tail is not a known entity text
    pub dangling_relation: usize,
}

impl MalformedCounts {
    pub fn total(&self) -> usize {
        self.entity_text_not_found
            + self.unknown_entity_type
            + self.unknown_relation_type
            + self.dangling_relation
    }

    pub fn absorb(&mut self, other: MalformedCounts) {
        self.entity_text_not_found += other.entity_text_not_found;
        self.unknown_entity_type += other.unknown_entity_type;
        self.unknown_relation_type += other.unknown_relation_type;
        self.dangling_relation += other.dangling_relation;
    }
}

/// Convert a source's raw entities into observations.
pub fn validate_entities(
    document: &str,
    source: &SourceId,
    raw: &[RawEntity],
) -> (Vec<EntityObservation>, MalformedCounts) {
    let mut counts = MalformedCounts::default();
    let mut observations = Vec::with_capacity(raw.len());

    for entity in raw {
        let text = entity.text.trim();
        if text.is_empty() || !document.contains(text) {
            counts.entity_text_not_found += 1;
            continue;
        }
        let Ok(entity_type) = entity.entity_type.parse::<EntityType>() else {
            counts.unknown_entity_type += 1;
            continue;
        };
        observations.push(EntityObservation::new(text, entity_type, source.clone()));
    }

    (observations, counts)
}

/// Convert a source's raw relations into observations.
///
/// `known_texts` is the set of entity texts that survived validation for the
/// document across all successful sources.
pub fn validate_relations(
    known_texts: &BTreeSet<String>,
    source: &SourceId,
    raw: &[RawRelation],
) -> (Vec<RelationObservation>, MalformedCounts) {
    let mut counts = MalformedCounts::default();
    let mut observations = Vec::with_capacity(raw.len());

    for relation in raw {
        let Ok(relation_type) = relation.relation.parse::<RelationType>() else {
            counts.unknown_relation_type += 1;
            continue;
        };
        let head = relation.head.trim();
        let tail = relation.tail.trim();
        if !known_texts.contains(head) || !known_texts.contains(tail) {
            counts.dangling_relation += 1;
            continue;
        }
        observations.push(RelationObservation::new(
            head,
            relation_type,
            tail,
            source.clone(),
        ));
    }

    (observations, counts)
}
