//! Configuration file loading for annotation-quorum
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `QUORUM_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./quorum.toml` or `./.quorum.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/annotation-quorum/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBehaviorConfig, FileConfig, FileInputConfig, FileOutputConfig,
    FileOutputFormat, FileReviewConfig, FileSourcesConfig,
};
pub use loader::ConfigLoader;
