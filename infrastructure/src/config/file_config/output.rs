//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Console output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOutputFormat {
    /// Colored human-readable summary
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

impl std::str::FromStr for FileOutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(FileOutputFormat::Text),
            "json" => Ok(FileOutputFormat::Json),
            other => Err(format!("Unknown output format: {}. Valid: text, json", other)),
        }
    }
}

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Directory for result and export files
    pub directory: PathBuf,
    /// Also write a CoNLL file per document
    pub conll: bool,
    pub format: FileOutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// JSONL audit log; disabled when unset
    pub audit_log: Option<PathBuf>,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            conll: true,
            format: FileOutputFormat::Text,
            color: true,
            audit_log: None,
        }
    }
}
