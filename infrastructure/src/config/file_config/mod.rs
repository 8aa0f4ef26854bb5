//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain and
//! application types once validated.
//!
//! ```toml
//! [sources]
//! doubao = 3
//! deepseek = 2
//! tongyi = 1
//!
//! [input]
//! documents = "data/*.txt"
//! extractions_dir = "extractions"
//!
//! [review]
//! cap = 10
//! stale_after_skips = 3
//!
//! [behavior]
//! max_concurrent_sources = 4
//! timeout_seconds = 120
//!
//! [output]
//! directory = "output"
//! conll = true
//! ```

mod behavior;
mod input;
mod output;
mod review;
mod sources;

pub use behavior::FileBehaviorConfig;
pub use input::FileInputConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use review::FileReviewConfig;
pub use sources::FileSourcesConfig;

use annoquorum_application::ReconcileParams;
use annoquorum_domain::{DomainError, ReliabilityTable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("invalid [sources] table: {0}")]
    Sources(#[from] DomainError),

    #[error("source id cannot be empty")]
    EmptySourceId,

    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("{0} must be at least 1")]
    InvalidConcurrency(&'static str),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Source id -> reliability rank
    pub sources: FileSourcesConfig,
    pub input: FileInputConfig,
    pub review: FileReviewConfig,
    pub behavior: FileBehaviorConfig,
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.sources.ids().any(|id| id.trim().is_empty()) {
            return Err(ConfigValidationError::EmptySourceId);
        }
        self.reliability_table().validate()?;

        // Timeout of 0 seconds doesn't make sense
        if let Some(0) = self.behavior.timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if self.behavior.max_concurrent_sources == 0 {
            return Err(ConfigValidationError::InvalidConcurrency(
                "max_concurrent_sources",
            ));
        }
        if self.behavior.max_concurrent_documents == 0 {
            return Err(ConfigValidationError::InvalidConcurrency(
                "max_concurrent_documents",
            ));
        }

        Ok(())
    }

    pub fn reliability_table(&self) -> ReliabilityTable {
        self.sources.to_table()
    }

    pub fn reconcile_params(&self) -> ReconcileParams {
        ReconcileParams::default()
            .with_review_cap(self.review.cap)
            .with_stale_after_skips(self.review.stale_after_skips)
            .with_max_concurrent_sources(self.behavior.max_concurrent_sources)
            .with_max_concurrent_documents(self.behavior.max_concurrent_documents)
            .with_timeout_seconds(self.behavior.timeout_seconds.unwrap_or(0))
    }
}
