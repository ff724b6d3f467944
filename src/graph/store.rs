//! Knowledge-graph store: upsert and query operations over Neo4j
//!
//! Every write uses `MERGE` semantics: create-if-absent, otherwise update
//! the listed fields only. All operations are safe to retry; no automatic
//! rollback spans multiple statements, so callers composing several calls
//! must tolerate partial completion and rely on idempotent retries.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use neo4rs::{query, Graph};
use tracing::debug;

use crate::error::{KgError, Result};
use crate::graph::types::{Concept, EdgeKind, ResourceRecord, ResourceSummary};

/// Graph operations consumed by the planner, the ingestion coordinator,
/// and the service façade.
///
/// Declared as a trait so each consumer can be tested against an
/// in-memory implementation; [`KnowledgeGraphStore`] is the Neo4j-backed
/// implementation.
#[allow(async_fn_in_trait)]
pub trait ConceptGraph {
    /// Create or update a Resource node keyed by `record.id`.
    /// Title and url are set both on create and on update; optional
    /// metadata fields are mirrored when present.
    async fn upsert_resource(&self, record: &ResourceRecord) -> Result<()>;

    /// Create a Concept node keyed by exact name if absent; no-op update
    /// if present.
    async fn upsert_concept(&self, name: &str) -> Result<()>;

    /// Upsert a concept and return it, echoing the canonical name.
    async fn register_concept(&self, name: &str) -> Result<Concept>;

    /// Ensure exactly one TEACHES edge between the resource and the
    /// concept, upserting the concept first if needed.
    async fn link_teaches(&self, resource_id: i64, concept_name: &str) -> Result<()>;

    /// Upsert both concept endpoints, then ensure a single edge of the
    /// given kind between them.
    async fn relate(&self, source: &str, target: &str, kind: EdgeKind) -> Result<()>;

    /// Upsert the learner profile and the concept, then set the
    /// KNOWS_LEVEL edge's level and refresh its updated_at timestamp.
    /// `level` is trusted; bounds are the caller's responsibility.
    async fn set_mastery_level(&self, user_id: i64, concept_name: &str, level: i64) -> Result<()>;

    /// All concepts the user has a KNOWS_LEVEL edge to, with levels.
    /// Empty if the profile does not exist.
    async fn known_concepts(&self, user_id: i64) -> Result<BTreeMap<String, i64>>;

    /// Every concept with a PREREQUISITE_FOR edge into `target` for which
    /// the user has no KNOWS_LEVEL edge at or above `threshold`. Empty if
    /// the target has no prerequisites.
    async fn unmet_prerequisites(
        &self,
        user_id: i64,
        target: &str,
        threshold: i64,
    ) -> Result<BTreeSet<String>>;

    /// Up to `limit` resources linked to the concept by TEACHES, ordered
    /// by resource id ascending so output is deterministic.
    async fn resources_teaching(&self, concept_name: &str, limit: i64)
        -> Result<Vec<ResourceSummary>>;
}

/// Neo4j-backed implementation of [`ConceptGraph`]
#[derive(Clone)]
pub struct KnowledgeGraphStore {
    graph: Graph,
}

impl KnowledgeGraphStore {
    /// Wrap a pooled neo4rs `Graph` handle.
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

impl ConceptGraph for KnowledgeGraphStore {
    async fn upsert_resource(&self, record: &ResourceRecord) -> Result<()> {
        debug!(resource_id = record.id, "Upserting resource node");

        // Optional metadata columns are mirrored only when present, so an
        // ingest without them never clears values set by a fuller sync.
        let mut meta_sets = Vec::new();
        if record.resource_type.is_some() {
            meta_sets.push("r.resource_type = $resource_type");
        }
        if record.source.is_some() {
            meta_sets.push("r.source = $source");
        }
        if record.difficulty.is_some() {
            meta_sets.push("r.difficulty = $difficulty");
        }
        if record.estimated_minutes.is_some() {
            meta_sets.push("r.estimated_minutes = $estimated_minutes");
        }

        let meta_clause = if meta_sets.is_empty() {
            String::new()
        } else {
            format!(" SET {}", meta_sets.join(", "))
        };

        let mut cypher = query(&format!(
            "MERGE (r:Resource {{resource_id: $resource_id}})
             ON CREATE SET r.title = $title, r.url = $url, r.created_at = $now
             ON MATCH SET r.title = $title, r.url = $url{}",
            meta_clause
        ))
        .param("resource_id", record.id)
        .param("title", record.title.clone())
        .param("url", record.url.clone())
        .param("now", now_rfc3339());

        if let Some(ref resource_type) = record.resource_type {
            cypher = cypher.param("resource_type", resource_type.clone());
        }
        if let Some(ref source) = record.source {
            cypher = cypher.param("source", source.clone());
        }
        if let Some(ref difficulty) = record.difficulty {
            cypher = cypher.param("difficulty", difficulty.clone());
        }
        if let Some(estimated_minutes) = record.estimated_minutes {
            cypher = cypher.param("estimated_minutes", estimated_minutes);
        }

        self.graph
            .run(cypher)
            .await
            .map_err(|e| KgError::store("upsert_resource", e))?;

        Ok(())
    }

    async fn upsert_concept(&self, name: &str) -> Result<()> {
        let cypher = query(
            "MERGE (c:Concept {name: $name})
             ON CREATE SET c.created_at = $now",
        )
        .param("name", name.to_string())
        .param("now", now_rfc3339());

        self.graph
            .run(cypher)
            .await
            .map_err(|e| KgError::store("upsert_concept", e))?;

        Ok(())
    }

    async fn register_concept(&self, name: &str) -> Result<Concept> {
        let cypher = query(
            "MERGE (c:Concept {name: $name})
             ON CREATE SET c.created_at = $now
             RETURN c.name AS name, c.created_at AS created_at",
        )
        .param("name", name.to_string())
        .param("now", now_rfc3339());

        let mut result = self
            .graph
            .execute(cypher)
            .await
            .map_err(|e| KgError::store("register_concept", e))?;

        let row = result
            .next()
            .await
            .map_err(|e| KgError::store("register_concept", e))?
            .ok_or_else(|| {
                KgError::store("register_concept", "MERGE returned no row")
            })?;

        let canonical_name: String = row
            .get("name")
            .map_err(|e| KgError::store("register_concept", e))?;

        let created_at = row
            .get::<String>("created_at")
            .ok()
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(Concept {
            name: canonical_name,
            created_at,
        })
    }

    async fn link_teaches(&self, resource_id: i64, concept_name: &str) -> Result<()> {
        let cypher = query(
            "MERGE (c:Concept {name: $name})
             ON CREATE SET c.created_at = $now
             WITH c
             MATCH (r:Resource {resource_id: $resource_id})
             MERGE (r)-[:TEACHES]->(c)",
        )
        .param("name", concept_name.to_string())
        .param("resource_id", resource_id)
        .param("now", now_rfc3339());

        self.graph
            .run(cypher)
            .await
            .map_err(|e| KgError::store("link_teaches", e))?;

        Ok(())
    }

    async fn relate(&self, source: &str, target: &str, kind: EdgeKind) -> Result<()> {
        // kind.as_str() comes from the EdgeKind allow-list; caller strings
        // never reach the query text.
        let cypher = query(&format!(
            "MERGE (a:Concept {{name: $source}})
             ON CREATE SET a.created_at = $now
             MERGE (b:Concept {{name: $target}})
             ON CREATE SET b.created_at = $now
             MERGE (a)-[:{}]->(b)",
            kind.as_str()
        ))
        .param("source", source.to_string())
        .param("target", target.to_string())
        .param("now", now_rfc3339());

        self.graph
            .run(cypher)
            .await
            .map_err(|e| KgError::store("relate", e))?;

        Ok(())
    }

    async fn set_mastery_level(&self, user_id: i64, concept_name: &str, level: i64) -> Result<()> {
        debug!(user_id, concept_name, level, "Setting mastery level");

        let cypher = query(
            "MERGE (u:LearnerProfile {user_id: $user_id})
             MERGE (c:Concept {name: $name})
             ON CREATE SET c.created_at = $now
             MERGE (u)-[k:KNOWS_LEVEL]->(c)
             SET k.level = $level, k.updated_at = $now",
        )
        .param("user_id", user_id)
        .param("name", concept_name.to_string())
        .param("level", level)
        .param("now", now_rfc3339());

        self.graph
            .run(cypher)
            .await
            .map_err(|e| KgError::store("set_mastery_level", e))?;

        Ok(())
    }

    async fn known_concepts(&self, user_id: i64) -> Result<BTreeMap<String, i64>> {
        let cypher = query(
            "MATCH (u:LearnerProfile {user_id: $user_id})-[k:KNOWS_LEVEL]->(c:Concept)
             RETURN c.name AS name, k.level AS level",
        )
        .param("user_id", user_id);

        let mut result = self
            .graph
            .execute(cypher)
            .await
            .map_err(|e| KgError::store("known_concepts", e))?;

        let mut known = BTreeMap::new();

        while let Some(row) = result
            .next()
            .await
            .map_err(|e| KgError::store("known_concepts", e))?
        {
            let name: String = row
                .get("name")
                .map_err(|e| KgError::store("known_concepts", e))?;
            let level: i64 = row
                .get("level")
                .map_err(|e| KgError::store("known_concepts", e))?;
            known.insert(name, level);
        }

        Ok(known)
    }

    async fn unmet_prerequisites(
        &self,
        user_id: i64,
        target: &str,
        threshold: i64,
    ) -> Result<BTreeSet<String>> {
        let cypher = query(
            "MATCH (p:Concept)-[:PREREQUISITE_FOR]->(:Concept {name: $target})
             OPTIONAL MATCH (:LearnerProfile {user_id: $user_id})-[k:KNOWS_LEVEL]->(p)
             WITH p.name AS name, k.level AS level
             WHERE level IS NULL OR level < $threshold
             RETURN name",
        )
        .param("target", target.to_string())
        .param("user_id", user_id)
        .param("threshold", threshold);

        let mut result = self
            .graph
            .execute(cypher)
            .await
            .map_err(|e| KgError::store("unmet_prerequisites", e))?;

        let mut unmet = BTreeSet::new();

        while let Some(row) = result
            .next()
            .await
            .map_err(|e| KgError::store("unmet_prerequisites", e))?
        {
            let name: String = row
                .get("name")
                .map_err(|e| KgError::store("unmet_prerequisites", e))?;
            unmet.insert(name);
        }

        Ok(unmet)
    }

    async fn resources_teaching(
        &self,
        concept_name: &str,
        limit: i64,
    ) -> Result<Vec<ResourceSummary>> {
        let cypher = query(
            "MATCH (r:Resource)-[:TEACHES]->(:Concept {name: $name})
             RETURN r.resource_id AS id, r.title AS title, r.url AS url,
                    r.resource_type AS resource_type, r.source AS source,
                    r.difficulty AS difficulty, r.estimated_minutes AS estimated_minutes
             ORDER BY id
             LIMIT $limit",
        )
        .param("name", concept_name.to_string())
        .param("limit", limit);

        let mut result = self
            .graph
            .execute(cypher)
            .await
            .map_err(|e| KgError::store("resources_teaching", e))?;

        let mut resources = Vec::new();

        while let Some(row) = result
            .next()
            .await
            .map_err(|e| KgError::store("resources_teaching", e))?
        {
            let id: i64 = row
                .get("id")
                .map_err(|e| KgError::store("resources_teaching", e))?;
            let title: String = row
                .get("title")
                .map_err(|e| KgError::store("resources_teaching", e))?;
            let url: String = row
                .get("url")
                .map_err(|e| KgError::store("resources_teaching", e))?;

            resources.push(ResourceSummary {
                id,
                title,
                url,
                resource_type: row.get("resource_type").ok(),
                source: row.get("source").ok(),
                difficulty: row.get("difficulty").ok(),
                estimated_minutes: row.get("estimated_minutes").ok(),
            });
        }

        Ok(resources)
    }
}
