//! Learning-path planner
//!
//! Given a learner and a target concept, computes the prerequisite-aware
//! set of concepts to teach and the resources recommended for each.
//! Unmet prerequisites take priority over the target itself; a learner
//! with foundational gaps is redirected to those first.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::graph::{ConceptGraph, ResourceSummary};

/// Planner tuning knobs
///
/// The production values (threshold 3, three resources per concept) are
/// the defaults; both are exposed rather than baked in.
#[derive(Debug, Clone, Copy)]
pub struct PlannerConfig {
    /// Minimum KNOWS_LEVEL at which a prerequisite counts as satisfied
    pub mastery_threshold: i64,
    /// Maximum teaching resources fetched per concept
    pub resources_per_concept: i64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            mastery_threshold: 3,
            resources_per_concept: 3,
        }
    }
}

/// One step of a learning path: a concept and the resources that teach it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningStep {
    pub concept: String,
    pub resources: Vec<ResourceSummary>,
}

/// An ordered set of learning steps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningPath {
    pub steps: Vec<LearningStep>,
}

/// Planner outcome
///
/// `NoPathFound` is a valid terminal result, not an error: it means no
/// authored content covers the learner's gap.
#[derive(Debug, Clone)]
pub enum PlanOutcome {
    Path(LearningPath),
    NoPathFound,
}

/// Computes personalized learning paths over a [`ConceptGraph`]
pub struct PathPlanner {
    config: PlannerConfig,
}

impl PathPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan the concepts a learner should study next for `target`, with
    /// up to `resources_per_concept` teaching resources each.
    ///
    /// Concepts with no teaching resources are dropped from the path; if
    /// nothing remains the outcome is [`PlanOutcome::NoPathFound`].
    pub async fn plan<G: ConceptGraph>(
        &self,
        graph: &G,
        user_id: i64,
        target: &str,
    ) -> Result<PlanOutcome> {
        // Fetched for observability; the threshold comparison itself is
        // delegated to the store query.
        let known = graph.known_concepts(user_id).await?;
        debug!(user_id, known_concepts = known.len(), "Planning path");

        let unmet = graph
            .unmet_prerequisites(user_id, target, self.config.mastery_threshold)
            .await?;

        let to_teach: Vec<String> = if unmet.is_empty() {
            // Target is ready to be studied directly.
            vec![target.to_string()]
        } else {
            unmet.into_iter().collect()
        };

        let mut steps = Vec::new();
        for concept in to_teach {
            let resources = graph
                .resources_teaching(&concept, self.config.resources_per_concept)
                .await?;
            if resources.is_empty() {
                debug!(concept = %concept, "No teaching resources; dropping from path");
                continue;
            }
            steps.push(LearningStep { concept, resources });
        }

        if steps.is_empty() {
            info!(user_id, target, "No path found: no authored content covers the gap");
            return Ok(PlanOutcome::NoPathFound);
        }

        info!(user_id, target, steps = steps.len(), "Learning path computed");
        Ok(PlanOutcome::Path(LearningPath { steps }))
    }
}
