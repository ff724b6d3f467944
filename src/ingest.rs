//! Best-effort knowledge-graph ingestion
//!
//! On new-resource events, extracts concepts from the resource text and
//! registers the resource and its TEACHES edges in the graph. Ingestion
//! never blocks or fails the primary resource-creation path: a missing
//! NLP capability or graph connection degrades to a logged no-op, and a
//! mid-loop store failure leaves the remaining concepts still attempted.

use tracing::{error, info, warn};

use crate::error::KgError;
use crate::extract::{ConceptExtractor, NlpEngine};
use crate::graph::{ConceptGraph, ResourceRecord};

/// Coordinates extraction and graph writes for newly added resources
pub struct IngestionCoordinator<G: ConceptGraph, N: NlpEngine> {
    store: Option<G>,
    extractor: ConceptExtractor<N>,
}

impl<G: ConceptGraph, N: NlpEngine> IngestionCoordinator<G, N> {
    /// `store` is `None` when no graph connection was established at
    /// startup; ingestion then degrades to a warning.
    pub fn new(store: Option<G>, extractor: ConceptExtractor<N>) -> Self {
        Self { store, extractor }
    }

    /// Register a resource and its extracted concepts in the graph.
    ///
    /// Fire-and-forget: every failure is logged, none is surfaced. No
    /// transactional atomicity spans the whole ingestion; each write is
    /// individually idempotent and safe to retry by re-ingesting.
    pub async fn ingest(&self, record: &ResourceRecord, description: Option<&str>) {
        let store = match &self.store {
            Some(store) => store,
            None => {
                warn!(
                    resource_id = record.id,
                    "Graph connection not available; skipping knowledge-graph ingestion"
                );
                return;
            }
        };

        let concepts = match self.extractor.extract(&record.title, description) {
            Ok(concepts) => concepts,
            Err(KgError::NlpUnavailable(detail)) => {
                warn!(
                    resource_id = record.id,
                    detail = %detail,
                    "NLP capability not available; skipping knowledge-graph ingestion"
                );
                return;
            }
            Err(e) => {
                error!(resource_id = record.id, error = %e, "Concept extraction failed");
                return;
            }
        };

        if let Err(e) = store.upsert_resource(record).await {
            error!(resource_id = record.id, error = %e, "Failed to upsert resource node");
            return;
        }

        let mut linked = 0usize;
        let mut failed = 0usize;
        for concept in &concepts {
            match store.link_teaches(record.id, concept).await {
                Ok(()) => linked += 1,
                Err(e) => {
                    // Keep going; the remaining concepts are still attempted.
                    error!(
                        resource_id = record.id,
                        concept = %concept,
                        error = %e,
                        "Failed to link TEACHES edge"
                    );
                    failed += 1;
                }
            }
        }

        info!(
            resource_id = record.id,
            linked, failed, "Knowledge graph updated for resource"
        );
    }
}
