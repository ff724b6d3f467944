//! Knowledge-graph schema and store
//!
//! Node types: Concept, Resource, LearnerProfile. Edge types: TEACHES
//! (Resource -> Concept), PREREQUISITE_FOR (Concept -> Concept) and
//! KNOWS_LEVEL (LearnerProfile -> Concept, carrying a mastery level).

pub mod store;
pub mod types;

pub use store::{ConceptGraph, KnowledgeGraphStore};
pub use types::{Concept, EdgeKind, ResourceRecord, ResourceSummary};
