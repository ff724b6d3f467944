//! Transport-independent service surface
//!
//! The request/response shapes exposed to the HTTP layer, plus the
//! validation that rejects malformed requests before any store call.
//! The relational store remains the source of truth for user and
//! resource existence; it is consulted through [`RelationalCatalog`]
//! before graph writes.

use serde::{Deserialize, Serialize};

use crate::error::{KgError, Result};
use crate::extract::NlpEngine;
use crate::graph::{ConceptGraph, EdgeKind, ResourceRecord};
use crate::ingest::IngestionCoordinator;
use crate::planner::{LearningStep, PathPlanner, PlanOutcome, PlannerConfig};

/// Existence checks against the relational store
///
/// The graph never invents users or resources; both must exist upstream
/// before a profile edge or resource projection is written.
#[allow(async_fn_in_trait)]
pub trait RelationalCatalog {
    async fn user_exists(&self, user_id: i64) -> Result<bool>;
    async fn resource_exists(&self, url: &str) -> Result<bool>;
}

/// Mastery levels are bounded; the store itself trusts its callers.
pub const MASTERY_LEVEL_MAX: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterConceptResponse {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelateConceptsResponse {
    pub source: String,
    pub edge_kind: String,
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetMasteryResponse {
    pub user_id: i64,
    pub concept: String,
    pub level: i64,
}

/// Outcome of a path request; "no path found" is a valid result, not an
/// error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum GeneratePathResponse {
    #[serde(rename_all = "camelCase")]
    Path {
        user_id: i64,
        target_concept: String,
        steps: Vec<LearningStep>,
    },
    #[serde(rename_all = "camelCase")]
    NoPathFound {
        user_id: i64,
        target_concept: String,
    },
}

/// Service façade over the store, planner, and ingestion coordinator
pub struct RecommendationService<G: ConceptGraph, C: RelationalCatalog, N: NlpEngine> {
    store: G,
    catalog: C,
    planner: PathPlanner,
    coordinator: IngestionCoordinator<G, N>,
}

fn require_name(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(KgError::Validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

impl<G: ConceptGraph, C: RelationalCatalog, N: NlpEngine> RecommendationService<G, C, N> {
    pub fn new(
        store: G,
        catalog: C,
        coordinator: IngestionCoordinator<G, N>,
        planner_config: PlannerConfig,
    ) -> Self {
        Self {
            store,
            catalog,
            planner: PathPlanner::new(planner_config),
            coordinator,
        }
    }

    /// Idempotent concept creation; echoes the canonical name.
    pub async fn register_concept(&self, name: &str) -> Result<RegisterConceptResponse> {
        let name = require_name(name, "concept name")?;
        let concept = self.store.register_concept(&name).await?;
        Ok(RegisterConceptResponse { name: concept.name })
    }

    /// Relate two concepts with an allow-listed edge kind.
    ///
    /// The kind is validated against [`EdgeKind`] before any query text is
    /// assembled; unknown kinds are a validation error.
    pub async fn relate_concepts(
        &self,
        source: &str,
        target: &str,
        edge_kind: &str,
    ) -> Result<RelateConceptsResponse> {
        let source = require_name(source, "source concept")?;
        let target = require_name(target, "target concept")?;
        let kind = EdgeKind::from_str(edge_kind).ok_or_else(|| {
            KgError::Validation(format!("edge kind '{}' is not allowed", edge_kind))
        })?;

        self.store.relate(&source, &target, kind).await?;

        Ok(RelateConceptsResponse {
            source,
            edge_kind: kind.as_str().to_string(),
            target,
        })
    }

    /// Record a learner's mastery level for a concept.
    ///
    /// Re-issuing overwrites the previous level rather than duplicating
    /// the edge. Concurrent updates for the same pair race at the store;
    /// last writer wins by design.
    pub async fn set_mastery(
        &self,
        user_id: i64,
        concept_name: &str,
        level: i64,
    ) -> Result<SetMasteryResponse> {
        let concept = require_name(concept_name, "concept name")?;
        if !(0..=MASTERY_LEVEL_MAX).contains(&level) {
            return Err(KgError::Validation(format!(
                "mastery level must be between 0 and {}, got {}",
                MASTERY_LEVEL_MAX, level
            )));
        }
        if !self.catalog.user_exists(user_id).await? {
            return Err(KgError::NotFound(format!("user {}", user_id)));
        }

        self.store.set_mastery_level(user_id, &concept, level).await?;

        Ok(SetMasteryResponse {
            user_id,
            concept,
            level,
        })
    }

    /// Compute a personalized learning path toward a target concept.
    pub async fn generate_path(
        &self,
        user_id: i64,
        target_concept: &str,
    ) -> Result<GeneratePathResponse> {
        let target = require_name(target_concept, "target concept")?;
        if !self.catalog.user_exists(user_id).await? {
            return Err(KgError::NotFound(format!("user {}", user_id)));
        }

        match self.planner.plan(&self.store, user_id, &target).await? {
            PlanOutcome::Path(path) => Ok(GeneratePathResponse::Path {
                user_id,
                target_concept: target,
                steps: path.steps,
            }),
            PlanOutcome::NoPathFound => Ok(GeneratePathResponse::NoPathFound {
                user_id,
                target_concept: target,
            }),
        }
    }

    /// Register a resource and its taught concepts in the graph.
    ///
    /// Fire-and-forget past the existence check: coordinator failures are
    /// logged, never surfaced. Rejects resources unknown to the
    /// relational store to keep the two stores loosely consistent.
    pub async fn ingest_resource(
        &self,
        record: &ResourceRecord,
        description: Option<&str>,
    ) -> Result<()> {
        if !self.catalog.resource_exists(&record.url).await? {
            return Err(KgError::NotFound(format!("resource {}", record.url)));
        }

        self.coordinator.ingest(record, description).await;
        Ok(())
    }
}
