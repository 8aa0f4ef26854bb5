//! Core domain concepts shared across all subdomains.
//!
//! - [`source::SourceId`]: identifier of one extraction source
//! - [`source::ReliabilityTable`]: static, injected source ranking
//! - [`confidence::Confidence`]: high / medium / low grade
//! - [`error::DomainError`]: domain-level errors

pub mod confidence;
pub mod error;
pub mod source;
