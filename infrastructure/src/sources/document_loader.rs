//! Loads the documents to reconcile from a glob pattern

use annoquorum_domain::Document;
use glob::glob;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum DocumentLoadError {
    #[error("Invalid glob pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads every file matching a glob as one document named by its file stem
#[derive(Debug, Clone, Default)]
pub struct DocumentLoader;

impl DocumentLoader {
    pub fn new() -> Self {
        Self
    }

    /// Matching documents in path order. Empty files are skipped.
    pub fn load_glob(&self, pattern: &str) -> Result<Vec<Document>, DocumentLoadError> {
        let entries = glob(pattern).map_err(|e| DocumentLoadError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("Skipping unreadable glob entry: {}", e);
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            if let Some(doc) = self.load_file(&path)? {
                documents.push(doc);
            }
        }
        debug!("Loaded {} documents matching {}", documents.len(), pattern);
        Ok(documents)
    }

    pub fn load_file(&self, path: &Path) -> Result<Option<Document>, DocumentLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| DocumentLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if text.trim().is_empty() {
            debug!("Skipping empty document {}", path.display());
            return Ok(None);
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Some(Document::new(name, text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_glob_sorted_by_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("卷二.txt"), "卒心痛，取内关。").unwrap();
        std::fs::write(dir.path().join("卷一.txt"), "热病头痛，刺风府。").unwrap();
        std::fs::write(dir.path().join("空.txt"), "  \n").unwrap();
        std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let pattern = format!("{}/*.txt", dir.path().display());
        let docs = DocumentLoader::new().load_glob(&pattern).unwrap();

        let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["卷一", "卷二"]);
        assert_eq!(docs[0].text, "热病头痛，刺风府。");
    }

    #[test]
    fn test_invalid_pattern() {
        let err = DocumentLoader::new().load_glob("data/[*.txt").unwrap_err();
        assert!(matches!(err, DocumentLoadError::InvalidPattern { .. }));
    }

    #[test]
    fn test_no_matches_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.txt", dir.path().display());
        assert!(DocumentLoader::new().load_glob(&pattern).unwrap().is_empty());
    }
}
