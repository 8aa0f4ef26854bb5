//! Character-level BIO tagging

use crate::annotation::EntityType;
use crate::resolution::FinalEntity;
use crate::span::locate_all;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Tag of one character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    O,
    B(EntityType),
    I(EntityType),
}

impl Tag {
    pub fn is_outside(&self) -> bool {
        matches!(self, Tag::O)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tag::O => write!(f, "O"),
            Tag::B(t) => write!(f, "B-{}", t.tag_code()),
            Tag::I(t) => write!(f, "I-{}", t.tag_code()),
        }
    }
}

impl std::str::FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "O" {
            return Ok(Tag::O);
        }
        let (prefix, code) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid tag: {}", s))?;
        let entity_type = code.parse::<EntityType>().map_err(|e| e.to_string())?;
        match prefix {
            "B" => Ok(Tag::B(entity_type)),
            "I" => Ok(Tag::I(entity_type)),
            _ => Err(format!("Invalid tag prefix: {}", s)),
        }
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Tag every character of `document`.
///
/// Entities are applied in list order. Each literal occurrence is stamped
/// only if every character it covers is still `O`, so the first entity to
/// claim a character keeps it. This greedy pass is order dependent and does
/// not search for an optimal covering; callers choose the order (see
/// [`crate::resolution::order_for_tagging`]).
pub fn to_char_tags(document: &str, entities: &[FinalEntity]) -> Vec<Tag> {
    let mut tags = vec![Tag::O; document.chars().count()];
    for entity in entities {
        for span in locate_all(document, &entity.text) {
            if span.is_empty() || !tags[span.start..span.end].iter().all(Tag::is_outside) {
                continue;
            }
            tags[span.start] = Tag::B(entity.entity_type);
            for tag in &mut tags[span.start + 1..span.end] {
                *tag = Tag::I(entity.entity_type);
            }
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::confidence::Confidence;
    use crate::resolution::Provenance;
    use std::collections::BTreeSet;

    fn entity(text: &str, entity_type: EntityType) -> FinalEntity {
        FinalEntity {
            text: text.to_string(),
            entity_type,
            confidence: Confidence::High,
            provenance: Provenance::Unanimous,
            sources: BTreeSet::new(),
            reliability_score: 1.0,
        }
    }

    fn render(tags: &[Tag]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_tag_display_and_parse() {
        assert_eq!(Tag::B(EntityType::Disease).to_string(), "B-DIS");
        assert_eq!(Tag::I(EntityType::Symptom).to_string(), "I-SYM");
        assert_eq!("I-ACU".parse::<Tag>().unwrap(), Tag::I(EntityType::Acupoint));
        assert_eq!("O".parse::<Tag>().unwrap(), Tag::O);
        assert!("X-DIS".parse::<Tag>().is_err());
    }

    #[test]
    fn test_every_occurrence_tagged() {
        let tags = to_char_tags("头痛，又头痛", &[entity("头痛", EntityType::Symptom)]);
        assert_eq!(
            render(&tags),
            vec!["B-SYM", "I-SYM", "O", "O", "B-SYM", "I-SYM"]
        );
    }

    #[test]
    fn test_overlap_first_wins() {
        // 足厥阴 claims its characters; the 厥阴 inside it is skipped, the
        // standalone 厥阴 is still tagged.
        let doc = "足厥阴，厥阴";
        let tags = to_char_tags(
            doc,
            &[
                entity("足厥阴", EntityType::Acupoint),
                entity("厥阴", EntityType::Disease),
            ],
        );
        assert_eq!(
            render(&tags),
            vec!["B-ACU", "I-ACU", "I-ACU", "O", "B-DIS", "I-DIS"]
        );
    }

    #[test]
    fn test_order_dependence() {
        let doc = "足厥阴";
        let tags = to_char_tags(
            doc,
            &[
                entity("厥阴", EntityType::Disease),
                entity("足厥阴", EntityType::Acupoint),
            ],
        );
        assert_eq!(render(&tags), vec!["O", "B-DIS", "I-DIS"]);
    }

    #[test]
    fn test_absent_entity_leaves_outside() {
        let tags = to_char_tags("身热", &[entity("头痛", EntityType::Symptom)]);
        assert!(tags.iter().all(Tag::is_outside));
        assert_eq!(tags.len(), 2);
    }
}
