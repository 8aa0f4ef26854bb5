//! BIO tagging of resolved entities for sequence-labeling export

pub mod bio;
pub mod export;

pub use bio::{Tag, to_char_tags};
pub use export::{BioChar, TaggingExport, TaggingStatistics};
