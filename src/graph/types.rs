//! Type definitions for knowledge-graph nodes and edges

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Allowed concept-to-concept edge kinds
///
/// Relationship labels are never taken from caller-supplied strings; every
/// dynamic edge kind must parse into this enum before a query is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeKind {
    /// Source concept must be mastered before the target
    PrerequisiteFor,
    /// Concepts cover related material
    RelatedTo,
    /// Source concept is a sub-topic of the target
    PartOf,
}

impl EdgeKind {
    /// Relationship label as stored in Neo4j
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::PrerequisiteFor => "PREREQUISITE_FOR",
            EdgeKind::RelatedTo => "RELATED_TO",
            EdgeKind::PartOf => "PART_OF",
        }
    }

    /// Parse an edge kind from its stored label. Returns `None` for
    /// anything outside the allow-list.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PREREQUISITE_FOR" => Some(EdgeKind::PrerequisiteFor),
            "RELATED_TO" => Some(EdgeKind::RelatedTo),
            "PART_OF" => Some(EdgeKind::PartOf),
            _ => None,
        }
    }
}

/// Concept node: a named unit of teachable knowledge
///
/// Identity is the exact (trimmed) name. Concepts are created implicitly
/// wherever they are referenced; every write is create-or-update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    /// Concept name, the node key
    pub name: String,
    /// Timestamp when the concept was first created
    pub created_at: Option<DateTime<Utc>>,
}

impl Concept {
    pub fn new(name: String) -> Self {
        Self {
            name,
            created_at: None,
        }
    }
}

/// Resource record as mirrored from the relational store
///
/// The graph's Resource node is a projection of the relational row: the
/// `id` matches the relational primary key and title/url are refreshed on
/// every upsert. The optional metadata fields are mirrored when supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Stable external identifier (relational primary key)
    pub id: i64,
    /// Resource title
    pub title: String,
    /// Resource URL (unique upstream)
    pub url: String,
    /// e.g. "article", "video"
    pub resource_type: Option<String>,
    /// Originating site or publisher
    pub source: Option<String>,
    /// e.g. "beginner", "intermediate", "advanced"
    pub difficulty: Option<String>,
    /// Estimated study time in minutes
    pub estimated_minutes: Option<i64>,
}

impl ResourceRecord {
    /// A record with only the required fields set.
    pub fn new(id: i64, title: String, url: String) -> Self {
        Self {
            id,
            title,
            url,
            resource_type: None,
            source: None,
            difficulty: None,
            estimated_minutes: None,
        }
    }
}

/// Resource summary returned by teaching-resource queries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSummary {
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub source: Option<String>,
    pub difficulty: Option<String>,
    pub estimated_minutes: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_kind_conversion() {
        assert_eq!(EdgeKind::PrerequisiteFor.as_str(), "PREREQUISITE_FOR");
        assert_eq!(EdgeKind::RelatedTo.as_str(), "RELATED_TO");
        assert_eq!(EdgeKind::PartOf.as_str(), "PART_OF");
    }

    #[test]
    fn test_edge_kind_parsing() {
        assert_eq!(
            EdgeKind::from_str("PREREQUISITE_FOR"),
            Some(EdgeKind::PrerequisiteFor)
        );
        assert_eq!(EdgeKind::from_str("related_to"), Some(EdgeKind::RelatedTo));
        assert_eq!(EdgeKind::from_str("PART_OF"), Some(EdgeKind::PartOf));
    }

    #[test]
    fn test_edge_kind_rejects_unknown_labels() {
        // Caller-controlled strings must never reach query text unparsed.
        assert_eq!(EdgeKind::from_str("TEACHES"), None);
        assert_eq!(EdgeKind::from_str("KNOWS_LEVEL"), None);
        assert_eq!(EdgeKind::from_str("X]->(n) DETACH DELETE n //"), None);
        assert_eq!(EdgeKind::from_str(""), None);
    }

    #[test]
    fn test_resource_record_defaults() {
        let record = ResourceRecord::new(7, "Intro to Recursion".to_string(), "https://example.com/r/7".to_string());
        assert_eq!(record.id, 7);
        assert!(record.resource_type.is_none());
        assert!(record.estimated_minutes.is_none());
    }

    #[test]
    fn test_resource_summary_wire_shape() {
        let summary = ResourceSummary {
            id: 1,
            title: "Loops 101".to_string(),
            url: "https://example.com/loops".to_string(),
            resource_type: Some("video".to_string()),
            source: None,
            difficulty: Some("beginner".to_string()),
            estimated_minutes: Some(25),
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["type"], "video");
        assert_eq!(json["estimatedMinutes"], 25);
    }
}
