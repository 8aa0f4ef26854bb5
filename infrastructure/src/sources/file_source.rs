//! Extraction source backed by precomputed output files
//!
//! Each source owns a directory under a common root and holds one JSON file
//! per document, named after the document:
//!
//! ```text
//! extractions/
//!   doubao/卷一.json      {"entities": [{"text": "头痛", "type": "症状"}], "relations": []}
//!   deepseek/卷一.json
//! ```
//!
//! A missing file is a failure of that source for that document only.

use annoquorum_application::{ExtractionSource, SourceError};
use annoquorum_domain::{Document, SourceExtraction, SourceId};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct FileExtractionSource {
    id: SourceId,
    dir: PathBuf,
}

impl FileExtractionSource {
    /// Source `id` reading from `<root>/<id>/`
    pub fn new(root: impl AsRef<Path>, id: impl Into<SourceId>) -> Self {
        let id = id.into();
        let dir = root.as_ref().join(id.as_str());
        Self { id, dir }
    }

    /// One source per id, all under the same root
    pub fn for_ids<'a>(
        root: impl AsRef<Path>,
        ids: impl IntoIterator<Item = &'a str>,
    ) -> Vec<Self> {
        ids.into_iter()
            .map(|id| Self::new(root.as_ref(), id))
            .collect()
    }

    pub fn output_path(&self, document: &Document) -> PathBuf {
        self.dir.join(format!("{}.json", document.name))
    }
}

#[async_trait]
impl ExtractionSource for FileExtractionSource {
    fn id(&self) -> &SourceId {
        &self.id
    }

    async fn extract(&self, document: &Document) -> Result<SourceExtraction, SourceError> {
        let path = self.output_path(document);
        debug!("Reading {} output from {}", self.id, path.display());

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SourceError::NotFound {
                    source_id: self.id.to_string(),
                    document: document.name.clone(),
                });
            }
            Err(e) => return Err(SourceError::Io(format!("{}: {}", path.display(), e))),
        };

        serde_json::from_str(&content)
            .map_err(|e| SourceError::Parse(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, source: &str, doc: &str, body: &str) {
        let dir = root.join(source);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{}.json", doc)), body).unwrap();
    }

    #[tokio::test]
    async fn test_reads_precomputed_output() {
        let root = tempfile::tempdir().unwrap();
        write(
            root.path(),
            "doubao",
            "卷一",
            r#"{"entities": [{"text": "头痛", "type": "症状"}],
                "relations": [{"head": "风府", "relation": "TREAT", "tail": "头痛"}]}"#,
        );

        let source = FileExtractionSource::new(root.path(), "doubao");
        let doc = Document::new("卷一", "热病头痛，刺风府。");
        let extraction = source.extract(&doc).await.unwrap();

        assert_eq!(source.id().as_str(), "doubao");
        assert_eq!(extraction.entities.len(), 1);
        assert_eq!(extraction.entities[0].entity_type, "症状");
        assert_eq!(extraction.relations[0].relation, "TREAT");
    }

    #[tokio::test]
    async fn test_relations_are_optional() {
        let root = tempfile::tempdir().unwrap();
        write(root.path(), "tongyi", "卷一", r#"{"entities": []}"#);

        let source = FileExtractionSource::new(root.path(), "tongyi");
        let extraction = source
            .extract(&Document::new("卷一", "热病头痛。"))
            .await
            .unwrap();
        assert!(extraction.relations.is_empty());
    }

    #[tokio::test]
    async fn test_missing_output_is_not_found() {
        let root = tempfile::tempdir().unwrap();
        let source = FileExtractionSource::new(root.path(), "deepseek");
        let err = source
            .extract(&Document::new("卷二", "身热。"))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_malformed_output_is_parse_error() {
        let root = tempfile::tempdir().unwrap();
        write(root.path(), "doubao", "卷一", "entities: []");
        let source = FileExtractionSource::new(root.path(), "doubao");
        let err = source
            .extract(&Document::new("卷一", "头痛。"))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }
}
