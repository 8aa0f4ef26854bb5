//! Annotation vocabulary: documents, labels, observations, canonical keys.

pub mod extraction;
pub mod labels;
pub mod observation;

pub use extraction::{
    Document, MalformedCounts, RawEntity, RawRelation, SourceExtraction, validate_entities,
    validate_relations,
};
pub use labels::{EntityType, RelationType};
pub use observation::{EntityKey, EntityObservation, RelationKey, RelationObservation};
