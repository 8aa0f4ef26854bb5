//! Input locations from TOML (`[input]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInputConfig {
    /// Glob matching the documents to reconcile
    pub documents: String,
    /// Root holding one directory of precomputed outputs per source
    pub extractions_dir: PathBuf,
}

impl Default for FileInputConfig {
    fn default() -> Self {
        Self {
            documents: "data/*.txt".to_string(),
            extractions_dir: PathBuf::from("extractions"),
        }
    }
}
