//! Final resolution: consensus + stored reviews -> final annotations

pub mod entities;
pub mod resolver;

pub use entities::{FinalEntity, FinalRelation, Provenance};
pub use resolver::{FinalResolver, order_for_tagging};
