//! Reconcile Document use case
//!
//! Orchestrates the full flow for one document:
//!
//! ```text
//! sources (parallel, bounded, timed) ─▶ barrier ─▶ analyze
//!     ─▶ select review candidates ─▶ enqueue
//!     ─▶ resolve (with stored reviews) ─▶ tag ─▶ write
//! ```

use crate::config::ReconcileParams;
use crate::ports::audit_logger::{AuditEvent, AuditLogger, NoAuditLogger};
use crate::ports::extraction_source::{ExtractionSource, SourceError};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::result_writer::{NoResultWriter, ResultWriteError, ResultWriter};
use crate::ports::review_queue::{ReviewQueue, ReviewQueueError};
use crate::ports::review_store::{ReviewStore, ReviewStoreError};
use annoquorum_domain::{
    ConsensusAnalysis, ConsensusAnalyzer, Document, FinalEntity, FinalRelation, FinalResolver,
    MalformedCounts, ReliabilityTable, ReviewTask, SourceId, SourceOutcome, TaggingExport,
    TierCounts, order_for_tagging, select_candidates,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that stop a document (or a review operation) outright
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("No extraction sources configured")]
    NoSources,

    #[error("Review store error: {0}")]
    Store(#[from] ReviewStoreError),

    #[error("Review queue error: {0}")]
    Queue(#[from] ReviewQueueError),

    #[error("Failed to write results: {0}")]
    Output(#[from] ResultWriteError),
}

/// Per-document counts reported after resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub doc_name: String,
    pub successful_sources: Vec<SourceId>,
    pub failed_sources: BTreeMap<SourceId, String>,
    pub entity_tiers: TierCounts,
    pub relation_tiers: TierCounts,
    pub malformed: MalformedCounts,
    pub final_entities: usize,
    pub final_relations: usize,
    /// Final entities whose type came from a reviewer
    pub reviewed_entities: usize,
    pub enqueued_tasks: usize,
}

impl DocumentSummary {
    fn new(
        doc_name: &str,
        analysis: &ConsensusAnalysis,
        final_entities: &[FinalEntity],
        final_relations: &[FinalRelation],
        enqueued: usize,
    ) -> Self {
        Self {
            doc_name: doc_name.to_string(),
            successful_sources: analysis.successful_sources.iter().cloned().collect(),
            failed_sources: analysis.failed_sources.clone(),
            entity_tiers: analysis.entity_tier_counts(),
            relation_tiers: analysis.relation_tier_counts(),
            malformed: analysis.malformed,
            final_entities: final_entities.len(),
            final_relations: final_relations.len(),
            reviewed_entities: final_entities
                .iter()
                .filter(|e| e.provenance.is_reviewed())
                .count(),
            enqueued_tasks: enqueued,
        }
    }
}

/// Everything produced for a resolved document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDocument {
    pub doc_name: String,
    pub final_entities: Vec<FinalEntity>,
    pub final_relations: Vec<FinalRelation>,
    pub summary: DocumentSummary,
    pub export: TaggingExport,
    /// Review tasks newly created for this document
    pub enqueued: Vec<ReviewTask>,
}

/// Result of reconciling one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentOutcome {
    Resolved(Box<ResolvedDocument>),
    /// No source succeeded; the document is left unprocessed
    Skipped { doc_name: String, reason: String },
}

impl DocumentOutcome {
    pub fn doc_name(&self) -> &str {
        match self {
            DocumentOutcome::Resolved(resolved) => &resolved.doc_name,
            DocumentOutcome::Skipped { doc_name, .. } => doc_name,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, DocumentOutcome::Resolved(_))
    }

    pub fn resolved(&self) -> Option<&ResolvedDocument> {
        match self {
            DocumentOutcome::Resolved(resolved) => Some(resolved),
            DocumentOutcome::Skipped { .. } => None,
        }
    }
}

/// Use case for reconciling a single document
pub struct ReconcileDocumentUseCase {
    sources: Vec<Arc<dyn ExtractionSource>>,
    table: Arc<ReliabilityTable>,
    store: Arc<dyn ReviewStore>,
    queue: Arc<dyn ReviewQueue>,
    writer: Arc<dyn ResultWriter>,
    audit: Arc<dyn AuditLogger>,
    params: ReconcileParams,
}

impl ReconcileDocumentUseCase {
    pub fn new(
        sources: Vec<Arc<dyn ExtractionSource>>,
        table: Arc<ReliabilityTable>,
        store: Arc<dyn ReviewStore>,
        queue: Arc<dyn ReviewQueue>,
    ) -> Self {
        Self {
            sources,
            table,
            store,
            queue,
            writer: Arc::new(NoResultWriter),
            audit: Arc::new(NoAuditLogger),
            params: ReconcileParams::default(),
        }
    }

    pub fn with_params(mut self, params: ReconcileParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_writer(mut self, writer: Arc<dyn ResultWriter>) -> Self {
        self.writer = writer;
        self
    }

    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    pub fn params(&self) -> &ReconcileParams {
        &self.params
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, document: &Document) -> Result<DocumentOutcome, ReconcileError> {
        self.execute_with_progress(document, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        document: &Document,
        progress: &dyn ProgressNotifier,
    ) -> Result<DocumentOutcome, ReconcileError> {
        if self.sources.is_empty() {
            return Err(ReconcileError::NoSources);
        }

        info!(
            "Reconciling {} with {} sources",
            document.name,
            self.sources.len()
        );

        let outcomes = self.gather_outcomes(document, progress).await;
        let analysis = ConsensusAnalyzer::new(&self.table).analyze(&document.text, &outcomes);

        if analysis.is_empty_run() {
            return Ok(self.skip(document, &analysis, progress));
        }

        let outcome = self.resolve(document, &analysis).await?;
        progress.on_document_complete(&document.name, true);
        Ok(outcome)
    }

    /// Query every source concurrently and wait for all of them
    async fn gather_outcomes(
        &self,
        document: &Document,
        progress: &dyn ProgressNotifier,
    ) -> Vec<SourceOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.params.max_concurrent_sources.max(1)));
        let shared = Arc::new(document.clone());
        let timeout = self.params.source_timeout;

        let mut join_set = JoinSet::new();
        let mut task_sources = HashMap::new();

        for source in &self.sources {
            let source = Arc::clone(source);
            let semaphore = Arc::clone(&semaphore);
            let document = Arc::clone(&shared);
            let source_id = source.id().clone();

            let handle = join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let id = source.id().clone();
                let result = match timeout {
                    Some(limit) => tokio::time::timeout(limit, source.extract(&document))
                        .await
                        .unwrap_or(Err(SourceError::Timeout(limit.as_secs()))),
                    None => source.extract(&document).await,
                };
                (id, result)
            });
            task_sources.insert(handle.id(), source_id);
        }

        let mut outcomes = Vec::new();

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((source, Ok(extraction))) => {
                    debug!(
                        "Source {} returned {} entities for {}",
                        source,
                        extraction.entities.len(),
                        document.name
                    );
                    progress.on_source_complete(&document.name, &source, true);
                    outcomes.push(SourceOutcome::success(source, extraction));
                }
                Ok((source, Err(e))) => {
                    warn!("Source {} failed for {}: {}", source, document.name, e);
                    progress.on_source_complete(&document.name, &source, false);
                    outcomes.push(SourceOutcome::failure(source, e.to_string()));
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                    if let Some(source) = task_sources.remove(&e.id()) {
                        progress.on_source_complete(&document.name, &source, false);
                        outcomes.push(SourceOutcome::failure(source, e.to_string()));
                    }
                }
            }
        }

        outcomes.sort_by(|a, b| a.source().cmp(b.source()));
        outcomes
    }

    fn skip(
        &self,
        document: &Document,
        analysis: &ConsensusAnalysis,
        progress: &dyn ProgressNotifier,
    ) -> DocumentOutcome {
        let reason = format!("all {} sources failed", self.sources.len());
        warn!("Skipping {}: {}", document.name, reason);
        self.audit.log(AuditEvent::new(
            AuditEvent::DOCUMENT_SKIPPED,
            json!({
                "doc_name": document.name,
                "reason": reason,
                "failed_sources": analysis.failed_sources,
            }),
        ));
        progress.on_document_complete(&document.name, false);
        DocumentOutcome::Skipped {
            doc_name: document.name.clone(),
            reason,
        }
    }

    async fn resolve(
        &self,
        document: &Document,
        analysis: &ConsensusAnalysis,
    ) -> Result<DocumentOutcome, ReconcileError> {
        let reviews = self.store.snapshot().await?;
        let pending = self.queue.pending_subjects().await?;

        let candidates = select_candidates(
            analysis,
            &self.table,
            &reviews,
            &pending,
            self.params.review_cap,
        );
        let consulted: Vec<SourceId> = analysis.successful_sources.iter().cloned().collect();
        let tasks: Vec<ReviewTask> = candidates
            .iter()
            .map(|candidate| ReviewTask::from_candidate(0, candidate, document, &consulted))
            .collect();
        let enqueued = if tasks.is_empty() {
            Vec::new()
        } else {
            self.queue.enqueue(tasks).await?
        };

        if !enqueued.is_empty() {
            info!("Enqueued {} review tasks for {}", enqueued.len(), document.name);
            self.audit.log(AuditEvent::new(
                AuditEvent::REVIEW_ENQUEUED,
                json!({
                    "doc_name": document.name,
                    "tasks": enqueued
                        .iter()
                        .map(|t| json!({"id": t.id, "subject": t.subject, "reason": t.reason}))
                        .collect::<Vec<_>>(),
                }),
            ));
        }

        let resolver = FinalResolver::new(&self.table);
        let final_entities = resolver.resolve_entities(analysis, &reviews);
        let final_relations = resolver.resolve_relations(analysis);
        let export = TaggingExport::build(
            &document.name,
            &document.text,
            &order_for_tagging(&final_entities),
        );
        let summary = DocumentSummary::new(
            &document.name,
            analysis,
            &final_entities,
            &final_relations,
            enqueued.len(),
        );

        let resolved = ResolvedDocument {
            doc_name: document.name.clone(),
            final_entities,
            final_relations,
            summary,
            export,
            enqueued,
        };

        let written = self.writer.write(&resolved).await?;
        for path in &written {
            debug!("Wrote {}", path.display());
        }

        info!(
            "Resolved {}: {} entities, {} relations",
            document.name,
            resolved.final_entities.len(),
            resolved.final_relations.len()
        );
        self.audit.log(AuditEvent::new(
            AuditEvent::DOCUMENT_RESOLVED,
            json!({ "summary": resolved.summary }),
        ));

        Ok(DocumentOutcome::Resolved(Box::new(resolved)))
    }
}
