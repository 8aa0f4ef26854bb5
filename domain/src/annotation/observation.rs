//! Observations and canonical keys

use super::labels::{EntityType, RelationType};
use crate::core::source::SourceId;
use serde::{Deserialize, Serialize};

/// Grouping identity for entities: same text AND same type.
///
/// Two observations with the same text but different types are different
/// keys; that difference is exactly what a conflict is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey {
    pub text: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
}

impl EntityKey {
    pub fn new(text: impl Into<String>, entity_type: EntityType) -> Self {
        Self {
            text: text.into(),
            entity_type,
        }
    }
}

impl std::fmt::Display for EntityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.text, self.entity_type)
    }
}

/// Grouping identity for relations
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationKey {
    pub head: String,
    pub relation: RelationType,
    pub tail: String,
}

impl RelationKey {
    pub fn new(head: impl Into<String>, relation: RelationType, tail: impl Into<String>) -> Self {
        Self {
            head: head.into(),
            relation,
            tail: tail.into(),
        }
    }
}

impl std::fmt::Display for RelationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -{}-> {}", self.head, self.relation, self.tail)
    }
}

/// One source's claim that `text` is an entity of `entity_type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityObservation {
    pub key: EntityKey,
    pub source: SourceId,
}

impl EntityObservation {
    pub fn new(text: impl Into<String>, entity_type: EntityType, source: impl Into<SourceId>) -> Self {
        Self {
            key: EntityKey::new(text, entity_type),
            source: source.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.key.text
    }
}

/// One source's claim that a relation holds between two entity texts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationObservation {
    pub key: RelationKey,
    pub source: SourceId,
}

impl RelationObservation {
    pub fn new(
        head: impl Into<String>,
        relation: RelationType,
        tail: impl Into<String>,
        source: impl Into<SourceId>,
    ) -> Self {
        Self {
            key: RelationKey::new(head, relation, tail),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_entity_key_identity_includes_type() {
        let a = EntityKey::new("风府", EntityType::Acupoint);
        let b = EntityKey::new("风府", EntityType::Treatment);
        let c = EntityKey::new("风府", EntityType::Acupoint);
        assert_ne!(a, b);
        assert_eq!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_relation_key_display() {
        let key = RelationKey::new("百会", RelationType::Treat, "头痛");
        assert_eq!(key.to_string(), "百会 -TREAT-> 头痛");
    }
}
