//! Error types for the knowledge-graph engine
//!
//! One crate-wide error enum covering the failure taxonomy: unavailable
//! dependencies, not-found, validation, and graph-store failures.

use thiserror::Error;

/// Main error type for knowledge-graph operations
#[derive(Error, Debug)]
pub enum KgError {
    /// Connection error - network or connection pool issues
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration error - missing or malformed settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// The external NLP capability is not available
    #[error("NLP capability unavailable: {0}")]
    NlpUnavailable(String),

    /// A referenced user, concept, or resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected before any store call was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// A graph-store operation failed; `op` names the failed operation
    #[error("Store operation '{op}' failed: {detail}")]
    Store { op: &'static str, detail: String },

    /// Neo4rs driver error (wrapper)
    #[error("Neo4rs driver error: {0}")]
    Driver(#[from] neo4rs::Error),
}

impl KgError {
    /// Wrap an underlying graph-database failure, naming the operation.
    pub fn store(op: &'static str, detail: impl ToString) -> Self {
        KgError::Store {
            op,
            detail: detail.to_string(),
        }
    }
}

/// Result type alias for knowledge-graph operations
pub type Result<T> = std::result::Result<T, KgError>;
