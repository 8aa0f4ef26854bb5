//! Runtime behavior from TOML (`[behavior]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBehaviorConfig {
    /// Sources queried at once for one document
    pub max_concurrent_sources: usize,
    /// Documents reconciled at once
    pub max_concurrent_documents: usize,
    /// Timeout in seconds for each source call
    pub timeout_seconds: Option<u64>,
}

impl Default for FileBehaviorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_sources: 4,
            max_concurrent_documents: 2,
            timeout_seconds: Some(120),
        }
    }
}
