//! Per-document tagging export

use super::bio::{Tag, to_char_tags};
use crate::resolution::FinalEntity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One non-whitespace character with its label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BioChar {
    pub char: char,
    pub label: Tag,
    /// Char offset into the document
    pub position: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggingStatistics {
    pub total_chars: usize,
    /// Tagged spans (one per `B-` tag)
    pub total_entities: usize,
    /// Tagged spans per type label
    pub per_type: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggingExport {
    pub doc_name: String,
    pub text: String,
    pub char_tags: Vec<Tag>,
    pub entities: Vec<FinalEntity>,
    pub bio: Vec<BioChar>,
    pub statistics: TaggingStatistics,
}

impl TaggingExport {
    /// Tag `document` with `entities` in the given order.
    pub fn build(doc_name: &str, document: &str, entities: &[FinalEntity]) -> Self {
        let char_tags = to_char_tags(document, entities);

        let bio: Vec<BioChar> = document
            .chars()
            .zip(char_tags.iter())
            .enumerate()
            .filter(|(_, (c, _))| !c.is_whitespace())
            .map(|(position, (c, tag))| BioChar {
                char: c,
                label: *tag,
                position,
            })
            .collect();

        let mut statistics = TaggingStatistics {
            total_chars: char_tags.len(),
            ..Default::default()
        };
        for tag in &char_tags {
            if let Tag::B(entity_type) = tag {
                statistics.total_entities += 1;
                *statistics
                    .per_type
                    .entry(entity_type.label().to_string())
                    .or_default() += 1;
            }
        }

        Self {
            doc_name: doc_name.to_string(),
            text: document.to_string(),
            char_tags,
            entities: entities.to_vec(),
            bio,
            statistics,
        }
    }

    /// CoNLL text: one `char\tlabel` line per non-whitespace character
    pub fn to_conll(&self) -> String {
        let mut out = String::with_capacity(self.bio.len() * 8);
        for entry in &self.bio {
            out.push(entry.char);
            out.push('\t');
            out.push_str(&entry.label.to_string());
            out.push('\n');
        }
        out
    }
}
