//! Review configuration from TOML (`[review]` section)

use annoquorum_application::DEFAULT_STALE_AFTER_SKIPS;
use annoquorum_domain::DEFAULT_REVIEW_CAP;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReviewConfig {
    /// Disputed entities considered for review per document
    pub cap: usize,
    /// Skips after which a pending task is listed as stale
    pub stale_after_skips: u32,
    /// Pending task queue (`{next_id, tasks}`)
    pub queue_file: PathBuf,
    /// Durable decisions (`{reviews, statistics, last_updated}`)
    pub store_file: PathBuf,
}

impl Default for FileReviewConfig {
    fn default() -> Self {
        Self {
            cap: DEFAULT_REVIEW_CAP,
            stale_after_skips: DEFAULT_STALE_AFTER_SKIPS,
            queue_file: PathBuf::from("review/review_tasks.json"),
            store_file: PathBuf::from("review/review_results.json"),
        }
    }
}
