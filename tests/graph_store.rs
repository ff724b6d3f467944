//! Integration tests for the Neo4j-backed knowledge-graph store
//!
//! These require a running Neo4j instance; run with:
//! `cargo test -- --ignored`. Connection details come from the
//! environment (NEO4J_URI, NEO4J_USER, NEO4J_PASSWORD, NEO4J_DATABASE).
//!
//! Every test namespaces its data with a unique prefix and cleans it up
//! first, so tests are safe to re-run against a shared instance.

use neo4rs::query;
use skillbridge_kg::{
    ConceptGraph, EdgeKind, GraphClient, GraphConfig, KnowledgeGraphStore, PathPlanner,
    PlanOutcome, PlannerConfig, ResourceRecord,
};

fn config_from_env() -> GraphConfig {
    let uri = std::env::var("NEO4J_URI").unwrap_or_else(|_| "bolt://localhost:7687".to_string());
    let user = std::env::var("NEO4J_USER").unwrap_or_else(|_| "neo4j".to_string());
    let password = std::env::var("NEO4J_PASSWORD").unwrap_or_else(|_| "password".to_string());
    let database = std::env::var("NEO4J_DATABASE").unwrap_or_else(|_| "neo4j".to_string());
    GraphConfig::new(&uri, &user, &password, &database)
}

async fn connect() -> GraphClient {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    GraphClient::connect(&config_from_env())
        .await
        .expect("Failed to connect to Neo4j")
}

/// Remove every node whose name or url carries the test prefix.
async fn cleanup(client: &GraphClient, prefix: &str) {
    client
        .graph()
        .run(
            query(
                "MATCH (n)
                 WHERE (n.name IS NOT NULL AND n.name STARTS WITH $prefix)
                    OR (n.url IS NOT NULL AND n.url STARTS WITH $prefix)
                 DETACH DELETE n",
            )
            .param("prefix", prefix.to_string()),
        )
        .await
        .expect("cleanup failed");
}

async fn count(client: &GraphClient, cypher: &str, name: &str) -> i64 {
    let mut result = client
        .graph()
        .execute(query(cypher).param("name", name.to_string()))
        .await
        .expect("count query failed");
    let row = result
        .next()
        .await
        .expect("count read failed")
        .expect("count returned no row");
    row.get("n").expect("count column missing")
}

#[tokio::test]
#[ignore]
async fn test_upsert_concept_is_idempotent() {
    let client = connect().await;
    let prefix = "it-idem-";
    cleanup(&client, prefix).await;

    let store = KnowledgeGraphStore::new(client.graph().clone());
    let name = format!("{}Loops", prefix);

    store.upsert_concept(&name).await.unwrap();
    store.upsert_concept(&name).await.unwrap();

    let nodes = count(
        &client,
        "MATCH (c:Concept {name: $name}) RETURN count(c) AS n",
        &name,
    )
    .await;
    assert_eq!(nodes, 1, "two upserts must leave exactly one Concept node");
}

#[tokio::test]
#[ignore]
async fn test_link_teaches_is_idempotent() {
    let client = connect().await;
    let prefix = "it-teach-";
    cleanup(&client, prefix).await;

    let store = KnowledgeGraphStore::new(client.graph().clone());
    let concept = format!("{}Recursion", prefix);
    let record = ResourceRecord::new(
        900_001,
        "Recursion Intro".to_string(),
        format!("{}https://example.com/r/900001", prefix),
    );

    store.upsert_resource(&record).await.unwrap();
    store.link_teaches(record.id, &concept).await.unwrap();
    store.link_teaches(record.id, &concept).await.unwrap();

    let edges = count(
        &client,
        "MATCH (:Resource)-[t:TEACHES]->(:Concept {name: $name}) RETURN count(t) AS n",
        &concept,
    )
    .await;
    assert_eq!(edges, 1, "two links must leave exactly one TEACHES edge");
}

#[tokio::test]
#[ignore]
async fn test_mastery_overwrites_instead_of_duplicating() {
    let client = connect().await;
    let prefix = "it-mastery-";
    cleanup(&client, prefix).await;

    let store = KnowledgeGraphStore::new(client.graph().clone());
    let concept = format!("{}Loops", prefix);
    let user_id = 910_001;

    store.set_mastery_level(user_id, &concept, 2).await.unwrap();
    store.set_mastery_level(user_id, &concept, 4).await.unwrap();

    let edges = count(
        &client,
        "MATCH (:LearnerProfile)-[k:KNOWS_LEVEL]->(:Concept {name: $name}) RETURN count(k) AS n",
        &concept,
    )
    .await;
    assert_eq!(edges, 1);

    let known = store.known_concepts(user_id).await.unwrap();
    assert_eq!(known.get(&concept), Some(&4));
}

#[tokio::test]
#[ignore]
async fn test_unmet_prerequisites_respect_threshold() {
    let client = connect().await;
    let prefix = "it-unmet-";
    cleanup(&client, prefix).await;

    let store = KnowledgeGraphStore::new(client.graph().clone());
    let variables = format!("{}Variables", prefix);
    let functions = format!("{}Functions", prefix);
    let loops = format!("{}Loops", prefix);
    let user_id = 920_001;

    store
        .relate(&variables, &loops, EdgeKind::PrerequisiteFor)
        .await
        .unwrap();
    store
        .relate(&functions, &loops, EdgeKind::PrerequisiteFor)
        .await
        .unwrap();
    store.set_mastery_level(user_id, &variables, 4).await.unwrap();

    let unmet = store.unmet_prerequisites(user_id, &loops, 3).await.unwrap();

    assert!(unmet.contains(&functions), "absent mastery counts as unmet");
    assert!(
        !unmet.contains(&variables),
        "mastery at or above threshold is satisfied"
    );
    assert_eq!(unmet.len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_unmet_prerequisites_empty_without_edges() {
    let client = connect().await;
    let prefix = "it-noprereq-";
    cleanup(&client, prefix).await;

    let store = KnowledgeGraphStore::new(client.graph().clone());
    let concept = format!("{}Standalone", prefix);
    store.upsert_concept(&concept).await.unwrap();

    let unmet = store.unmet_prerequisites(930_001, &concept, 3).await.unwrap();
    assert!(unmet.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_resources_teaching_caps_and_orders() {
    let client = connect().await;
    let prefix = "it-cap-";
    cleanup(&client, prefix).await;

    let store = KnowledgeGraphStore::new(client.graph().clone());
    let concept = format!("{}Loops", prefix);

    for i in 0..10 {
        let id = 940_000 + i;
        let record = ResourceRecord::new(
            id,
            format!("Loops resource {}", i),
            format!("{}https://example.com/r/{}", prefix, id),
        );
        store.upsert_resource(&record).await.unwrap();
        store.link_teaches(id, &concept).await.unwrap();
    }

    let resources = store.resources_teaching(&concept, 3).await.unwrap();

    assert_eq!(resources.len(), 3);
    // Deterministic secondary sort key: ascending resource id.
    let ids: Vec<i64> = resources.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![940_000, 940_001, 940_002]);
}

#[tokio::test]
#[ignore]
async fn test_planner_against_live_store() {
    let client = connect().await;
    let prefix = "it-plan-";
    cleanup(&client, prefix).await;

    let store = KnowledgeGraphStore::new(client.graph().clone());
    let variables = format!("{}Variables", prefix);
    let loops = format!("{}Loops", prefix);
    let user_id = 950_001;

    store
        .relate(&variables, &loops, EdgeKind::PrerequisiteFor)
        .await
        .unwrap();

    let record = ResourceRecord::new(
        950_100,
        "Variables 101".to_string(),
        format!("{}https://example.com/r/950100", prefix),
    );
    store.upsert_resource(&record).await.unwrap();
    store.link_teaches(record.id, &variables).await.unwrap();

    let planner = PathPlanner::new(PlannerConfig::default());
    match planner.plan(&store, user_id, &loops).await.unwrap() {
        PlanOutcome::Path(path) => {
            assert_eq!(path.steps.len(), 1);
            assert_eq!(path.steps[0].concept, variables);
            assert_eq!(path.steps[0].resources[0].id, 950_100);
        }
        PlanOutcome::NoPathFound => panic!("expected a path"),
    }

    // Once the prerequisite is mastered but neither concept gains new
    // content for the target itself, the planner reports no path.
    store.set_mastery_level(user_id, &variables, 5).await.unwrap();
    let outcome = planner.plan(&store, user_id, &loops).await.unwrap();
    assert!(matches!(outcome, PlanOutcome::NoPathFound));
}
