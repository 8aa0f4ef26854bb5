//! Result writer port
//!
//! Persists per-document results (final annotations and tagging export).

use crate::use_cases::reconcile_document::ResolvedDocument;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResultWriteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[async_trait]
pub trait ResultWriter: Send + Sync {
    /// Write one resolved document; returns the paths written
    async fn write(&self, resolved: &ResolvedDocument) -> Result<Vec<PathBuf>, ResultWriteError>;
}

/// Writer that discards results
pub struct NoResultWriter;

#[async_trait]
impl ResultWriter for NoResultWriter {
    async fn write(&self, _resolved: &ResolvedDocument) -> Result<Vec<PathBuf>, ResultWriteError> {
        Ok(Vec::new())
    }
}
