//! # SkillBridge Knowledge Graph (skillbridge-kg)
//!
//! The knowledge-graph recommendation engine of the SkillBridge learning
//! backend: concept extraction from resource text, a typed concept graph
//! over Neo4j, and prerequisite-aware learning-path planning.
//!
//! ## Features
//!
//! - Idempotent MERGE-based graph writes (create-or-update, safe to retry)
//! - Async-first design using tokio with pooled Neo4j connections
//! - Injected, independently mockable NLP and catalog dependencies
//! - Allow-listed concept edge kinds (no caller strings in query text)
//! - Best-effort ingestion that never blocks resource creation
//!
//! ## Graph schema
//!
//! Nodes: `Concept {name}`, `Resource {resource_id, title, url}`,
//! `LearnerProfile {user_id}`. Edges: `(Resource)-[:TEACHES]->(Concept)`,
//! `(Concept)-[:PREREQUISITE_FOR]->(Concept)` and
//! `(LearnerProfile)-[:KNOWS_LEVEL {level, updated_at}]->(Concept)`.
//!
//! ## Planning a learning path
//!
//! ```no_run
//! use skillbridge_kg::{
//!     ConceptGraph, GraphClient, GraphConfig, KnowledgeGraphStore, PathPlanner, PlanOutcome,
//!     PlannerConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GraphClient::connect(&GraphConfig::from_env()?).await?;
//!     let store = KnowledgeGraphStore::new(client.graph().clone());
//!
//!     store.relate(
//!         "Variables",
//!         "Loops",
//!         skillbridge_kg::EdgeKind::PrerequisiteFor,
//!     ).await?;
//!
//!     let planner = PathPlanner::new(PlannerConfig::default());
//!     match planner.plan(&store, 1, "Loops").await? {
//!         PlanOutcome::Path(path) => {
//!             for step in path.steps {
//!                 println!("study {} ({} resources)", step.concept, step.resources.len());
//!             }
//!         }
//!         PlanOutcome::NoPathFound => println!("no authored content covers the gap"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Ingesting a resource
//!
//! ```no_run
//! use skillbridge_kg::{
//!     ConceptExtractor, GraphClient, GraphConfig, IngestionCoordinator, KnowledgeGraphStore,
//!     ResourceRecord, RuleBasedTagger,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GraphClient::connect(&GraphConfig::from_env()?).await?;
//!     let store = KnowledgeGraphStore::new(client.graph().clone());
//!
//!     let coordinator =
//!         IngestionCoordinator::new(Some(store), ConceptExtractor::new(RuleBasedTagger));
//!
//!     let record = ResourceRecord::new(
//!         42,
//!         "Intro to Recursion".to_string(),
//!         "https://example.com/recursion".to_string(),
//!     );
//!     coordinator.ingest(&record, Some("Base cases and call stacks.")).await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod connection;
pub mod error;
pub mod extract;
pub mod graph;
pub mod ingest;
pub mod planner;

// Re-export main types for convenience
pub use api::{
    GeneratePathResponse, RecommendationService, RegisterConceptResponse, RelateConceptsResponse,
    RelationalCatalog, SetMasteryResponse, MASTERY_LEVEL_MAX,
};
pub use connection::{GraphClient, GraphConfig};
pub use error::{KgError, Result};
pub use extract::{Annotations, ConceptExtractor, NlpEngine, PhrasePolicy, RuleBasedTagger};
pub use graph::{Concept, ConceptGraph, EdgeKind, KnowledgeGraphStore, ResourceRecord, ResourceSummary};
pub use ingest::IngestionCoordinator;
pub use planner::{LearningPath, LearningStep, PathPlanner, PlanOutcome, PlannerConfig};
