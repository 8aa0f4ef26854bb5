//! Infrastructure layer for annotation-quorum
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod output;
pub mod sources;
pub mod storage;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileBehaviorConfig, FileConfig, FileInputConfig,
    FileOutputConfig, FileOutputFormat, FileReviewConfig, FileSourcesConfig,
};
pub use logging::JsonlAuditLogger;
pub use output::JsonResultWriter;
pub use sources::{DocumentLoadError, DocumentLoader, FileExtractionSource};
pub use storage::{JsonReviewQueue, JsonReviewStore};
