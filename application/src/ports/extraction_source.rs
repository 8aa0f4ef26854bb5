//! Extraction source port
//!
//! Defines the interface for the independent annotators whose outputs are
//! reconciled. Sources are black boxes: the core never assumes anything
//! about how they produce their output.

use annoquorum_domain::{Document, SourceExtraction, SourceId};
use async_trait::async_trait;
use thiserror::Error;

/// Errors a single source can report for one document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("No output from source {source_id} for document {document}")]
    NotFound { source_id: String, document: String },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Malformed source output: {0}")]
    Parse(String),

    #[error("Timed out after {0} seconds")]
    Timeout(u64),

    #[error("Other error: {0}")]
    Other(String),
}

/// One independent annotator
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ExtractionSource: Send + Sync {
    /// Identifier used for reliability lookup and provenance
    fn id(&self) -> &SourceId;

    /// Annotate one document
    async fn extract(&self, document: &Document) -> Result<SourceExtraction, SourceError>;
}
