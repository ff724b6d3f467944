//! Neo4j connection management
//!
//! Provides the pooled graph client used by the knowledge-graph store,
//! plus environment-based configuration in the shape the deployment uses
//! (`NEO4J_URI`, `NEO4J_USER`, `NEO4J_PASSWORD`, `NEO4J_DATABASE`).

use crate::error::{KgError, Result};
use neo4rs::{query, ConfigBuilder, Graph};
use tracing::{debug, info};

/// Connection settings for the graph database
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Bolt URI, e.g. "bolt://localhost:7687"
    pub uri: String,
    /// Username for authentication
    pub user: String,
    /// Password for authentication
    pub password: String,
    /// Database name (default: "neo4j")
    pub database: String,
}

impl GraphConfig {
    pub fn new(uri: &str, user: &str, password: &str, database: &str) -> Self {
        Self {
            uri: uri.to_string(),
            user: user.to_string(),
            password: password.to_string(),
            database: database.to_string(),
        }
    }

    /// Load connection settings from the environment (a `.env` file is
    /// honored if present). `NEO4J_URI` and `NEO4J_PASSWORD` are required;
    /// user and database fall back to "neo4j".
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let uri = std::env::var("NEO4J_URI")
            .map_err(|_| KgError::Config("NEO4J_URI is not set".to_string()))?;
        let password = std::env::var("NEO4J_PASSWORD")
            .map_err(|_| KgError::Config("NEO4J_PASSWORD is not set".to_string()))?;
        let user = std::env::var("NEO4J_USER").unwrap_or_else(|_| "neo4j".to_string());
        let database = std::env::var("NEO4J_DATABASE").unwrap_or_else(|_| "neo4j".to_string());

        Ok(Self {
            uri,
            user,
            password,
            database,
        })
    }
}

/// Pooled Neo4j client
///
/// Wraps a `neo4rs::Graph`, which manages a bounded connection pool
/// internally; each logical operation borrows a pooled connection for the
/// duration of the call and releases it on every exit path.
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect to Neo4j and verify connectivity.
    ///
    /// # Example
    /// ```no_run
    /// use skillbridge_kg::{GraphClient, GraphConfig};
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let config = GraphConfig::new("bolt://localhost:7687", "neo4j", "password", "neo4j");
    ///     let client = GraphClient::connect(&config).await?;
    ///     assert!(client.verify_connectivity().await.is_ok());
    ///     Ok(())
    /// }
    /// ```
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        info!(
            "Connecting to Neo4j at {} (database: {})",
            config.uri, config.database
        );

        let driver_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .fetch_size(500)
            .max_connections(16)
            .build()
            .map_err(|e| KgError::Config(e.to_string()))?;

        let graph = Graph::connect(driver_config)
            .await
            .map_err(|e| KgError::Connection(e.to_string()))?;

        info!("Successfully connected to Neo4j");

        Ok(Self { graph })
    }

    /// Cheapest possible connectivity probe (`RETURN 1`).
    ///
    /// Used once at startup, mirroring the driver-level connectivity
    /// verification the backend performs before serving requests.
    pub async fn verify_connectivity(&self) -> Result<()> {
        debug!("Verifying Neo4j connectivity (RETURN 1)");

        self.graph
            .run(query("RETURN 1"))
            .await
            .map_err(|e| KgError::Connection(e.to_string()))?;

        debug!("Neo4j connectivity verified");
        Ok(())
    }

    /// Get a reference to the underlying neo4rs `Graph` for custom queries.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}
