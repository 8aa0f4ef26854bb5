//! Entity and relation type vocabularies

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Entity type (Value Object)
///
/// Serialized with its Chinese label, which is what sources and reviewers
/// use. Parsing also accepts the English names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityType {
    Disease,
    Symptom,
    Acupoint,
    Treatment,
}

impl EntityType {
    pub const ALL: [EntityType; 4] = [
        EntityType::Disease,
        EntityType::Symptom,
        EntityType::Acupoint,
        EntityType::Treatment,
    ];

    /// Label used in source output and review options
    pub fn label(&self) -> &'static str {
        match self {
            EntityType::Disease => "病名",
            EntityType::Symptom => "症状",
            EntityType::Acupoint => "穴位",
            EntityType::Treatment => "治法",
        }
    }

    /// Short code used in BIO tags (`B-DIS`, `I-ACU`, ...)
    pub fn tag_code(&self) -> &'static str {
        match self {
            EntityType::Disease => "DIS",
            EntityType::Symptom => "SYM",
            EntityType::Acupoint => "ACU",
            EntityType::Treatment => "TRE",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for EntityType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "病名" => Ok(EntityType::Disease),
            "症状" => Ok(EntityType::Symptom),
            "穴位" => Ok(EntityType::Acupoint),
            "治法" => Ok(EntityType::Treatment),
            other => match other.to_ascii_uppercase().as_str() {
                "DISEASE" | "DIS" => Ok(EntityType::Disease),
                "SYMPTOM" | "SYM" => Ok(EntityType::Symptom),
                "ACUPOINT" | "ACU" => Ok(EntityType::Acupoint),
                "TREATMENT" | "TRE" => Ok(EntityType::Treatment),
                _ => Err(DomainError::UnknownEntityType(other.to_string())),
            },
        }
    }
}

impl Serialize for EntityType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for EntityType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Relation type between two entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    Treat,
    Manifest,
    MainTreat,
}

impl RelationType {
    pub const ALL: [RelationType; 3] = [
        RelationType::Treat,
        RelationType::Manifest,
        RelationType::MainTreat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::Treat => "TREAT",
            RelationType::Manifest => "MANIFEST",
            RelationType::MainTreat => "MAIN_TREAT",
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RelationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TREAT" => Ok(RelationType::Treat),
            "MANIFEST" => Ok(RelationType::Manifest),
            "MAIN_TREAT" => Ok(RelationType::MainTreat),
            _ => Err(DomainError::UnknownRelationType(s.to_string())),
        }
    }
}
