//! Per-document result files
//!
//! For a document named `卷一` the writer produces, under its directory:
//!
//! - `final_卷一.json`: final entities, relations and the run summary
//! - `tagging_卷一.json`: the character tagging export
//! - `卷一.conll`: one `char\tlabel` line per character (optional)

use crate::storage::write_json_atomic;
use annoquorum_application::{DocumentSummary, ResolvedDocument, ResultWriteError, ResultWriter};
use annoquorum_domain::{FinalEntity, FinalRelation};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Serialize)]
struct FinalFile<'a> {
    doc_name: &'a str,
    entities: &'a [FinalEntity],
    relations: &'a [FinalRelation],
    summary: &'a DocumentSummary,
    generated_at: String,
}

pub struct JsonResultWriter {
    directory: PathBuf,
    conll: bool,
}

impl JsonResultWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            conll: true,
        }
    }

    pub fn with_conll(mut self, conll: bool) -> Self {
        self.conll = conll;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn final_path(&self, doc_name: &str) -> PathBuf {
        self.directory.join(format!("final_{}.json", doc_name))
    }

    pub fn tagging_path(&self, doc_name: &str) -> PathBuf {
        self.directory.join(format!("tagging_{}.json", doc_name))
    }

    pub fn conll_path(&self, doc_name: &str) -> PathBuf {
        self.directory.join(format!("{}.conll", doc_name))
    }
}

#[async_trait]
impl ResultWriter for JsonResultWriter {
    async fn write(&self, resolved: &ResolvedDocument) -> Result<Vec<PathBuf>, ResultWriteError> {
        let doc_name = resolved.doc_name.as_str();
        let mut written = Vec::with_capacity(3);

        let final_path = self.final_path(doc_name);
        let file = FinalFile {
            doc_name,
            entities: &resolved.final_entities,
            relations: &resolved.final_relations,
            summary: &resolved.summary,
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        write_json_atomic(&final_path, &file).await?;
        written.push(final_path);

        let tagging_path = self.tagging_path(doc_name);
        write_json_atomic(&tagging_path, &resolved.export).await?;
        written.push(tagging_path);

        if self.conll {
            let conll_path = self.conll_path(doc_name);
            tokio::fs::write(&conll_path, resolved.export.to_conll()).await?;
            written.push(conll_path);
        }

        debug!("Wrote {} result files for {}", written.len(), doc_name);
        Ok(written)
    }
}
