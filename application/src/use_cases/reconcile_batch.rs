//! Reconcile Batch use case
//!
//! Runs [`ReconcileDocumentUseCase`] over many documents, a bounded number
//! at a time. Each document keeps its own source barrier; documents do not
//! wait for each other.

use super::reconcile_document::{DocumentOutcome, ReconcileDocumentUseCase, ReconcileError};
use crate::ports::progress::ProgressNotifier;
use annoquorum_domain::Document;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

/// Results of a batch, in input order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<DocumentOutcome>,
    /// Documents that stopped with an error (store, queue or output failure)
    pub failures: Vec<(String, ReconcileError)>,
}

impl BatchReport {
    pub fn resolved_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_resolved()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.resolved_count()
    }

    pub fn enqueued_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.resolved())
            .map(|r| r.enqueued.len())
            .sum()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

pub struct ReconcileBatchUseCase {
    document: Arc<ReconcileDocumentUseCase>,
}

impl ReconcileBatchUseCase {
    pub fn new(document: Arc<ReconcileDocumentUseCase>) -> Self {
        Self { document }
    }

    pub async fn execute(
        &self,
        documents: &[Document],
        progress: &dyn ProgressNotifier,
    ) -> BatchReport {
        let limit = self.document.params().max_concurrent_documents.max(1);
        info!(
            "Reconciling {} documents ({} at a time)",
            documents.len(),
            limit
        );
        progress.on_batch_start(documents.len());

        let mut results: Vec<(usize, String, Result<DocumentOutcome, ReconcileError>)> =
            stream::iter(documents.iter().enumerate())
                .map(|(index, document)| async move {
                    let result = self
                        .document
                        .execute_with_progress(document, progress)
                        .await;
                    (index, document.name.clone(), result)
                })
                .buffer_unordered(limit)
                .collect()
                .await;
        results.sort_by_key(|(index, _, _)| *index);

        let mut report = BatchReport::default();
        for (_, name, result) in results {
            match result {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(e) => {
                    warn!("Document {} failed: {}", name, e);
                    report.failures.push((name, e));
                }
            }
        }

        progress.on_batch_complete();
        info!(
            "Batch complete: {} resolved, {} skipped, {} failed",
            report.resolved_count(),
            report.skipped_count(),
            report.failures.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::extraction_source::{ExtractionSource, SourceError};
    use crate::ports::progress::NoProgress;
    use crate::ports::review_queue::{InMemoryReviewQueue, ReviewQueue};
    use crate::ports::review_store::InMemoryReviewStore;
    use crate::config::ReconcileParams;
    use annoquorum_domain::{RawEntity, ReliabilityTable, SourceExtraction, SourceId};
    use async_trait::async_trait;

    /// Reports 风府 as an acupoint or a treatment depending on its id,
    /// and fails on documents named "broken".
    struct SplitSource {
        id: SourceId,
        label: &'static str,
    }

    #[async_trait]
    impl ExtractionSource for SplitSource {
        fn id(&self) -> &SourceId {
            &self.id
        }

        async fn extract(&self, document: &Document) -> Result<SourceExtraction, SourceError> {
            if document.name == "broken" {
                return Err(SourceError::Other("unavailable".to_string()));
            }
            Ok(SourceExtraction::entities_only(vec![RawEntity::new(
                "风府", self.label,
            )]))
        }
    }

    #[tokio::test]
    async fn test_batch_keeps_input_order_and_shares_queue() {
        let queue = Arc::new(InMemoryReviewQueue::default());
        let document = ReconcileDocumentUseCase::new(
            vec![
                Arc::new(SplitSource { id: "a".into(), label: "穴位" }) as Arc<dyn ExtractionSource>,
                Arc::new(SplitSource { id: "b".into(), label: "治法" }),
            ],
            Arc::new(ReliabilityTable::from_pairs([("a", 2), ("b", 1)])),
            Arc::new(InMemoryReviewStore::new()),
            Arc::clone(&queue) as Arc<dyn ReviewQueue>,
        )
        .with_params(ReconcileParams::default().with_max_concurrent_documents(3));
        let batch = ReconcileBatchUseCase::new(Arc::new(document));

        let documents = vec![
            Document::new("一", "刺风府。"),
            Document::new("broken", "刺风府。"),
            Document::new("三", "灸风府。"),
        ];
        let report = batch.execute(&documents, &NoProgress).await;

        let names: Vec<_> = report.outcomes.iter().map(|o| o.doc_name()).collect();
        assert_eq!(names, vec!["一", "broken", "三"]);
        assert_eq!(report.resolved_count(), 2);
        assert_eq!(report.skipped_count(), 1);
        assert!(!report.has_failures());
        // the same subject is queued once across documents
        assert_eq!(report.enqueued_count(), 1);
        assert_eq!(queue.tasks().await.unwrap().len(), 1);
    }
}
