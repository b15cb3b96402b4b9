//! Command handlers for the batch driver.

use std::fs;

use anyhow::Context;
use tracing::info;

use recall_clustering::{ClusterRequest, ClusteringEngine};
use recall_retrieval::SimilarityRanker;
use recall_topics::coverage::{analyze_coverage, TopicMap};
use recall_types::{MemoryRecord, VectorRecord};

use crate::settings::Settings;

/// Initialize tracing with RUST_LOG taking precedence over the settings.
pub fn init_logging(log_level: &str) -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Cluster records from `input` and write the outcome JSON.
pub fn handle_cluster(
    settings: &Settings,
    input: &str,
    output: Option<&str>,
    clusters: Option<usize>,
    euclidean: bool,
    memories: bool,
) -> anyhow::Result<()> {
    let data = fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))?;

    let request = ClusterRequest {
        n_clusters: clusters,
        use_cosine: euclidean.then_some(false),
    };
    let engine = ClusteringEngine::new(settings.engine.clone());

    let outcome = if memories {
        let records: Vec<MemoryRecord> =
            serde_json::from_str(&data).context("Input is not a memory-record array")?;
        info!(count = records.len(), "Clustering memory records");
        engine.cluster_memories(&records, &request)?
    } else {
        let records: Vec<VectorRecord> =
            serde_json::from_str(&data).context("Input is not an {id, vector} array")?;
        info!(count = records.len(), "Clustering vector records");
        engine.cluster_vectors(&records, &request)?
    };

    info!(
        clusters = outcome.clusters.len(),
        fallback = %outcome.fallback_used,
        "Clustering complete"
    );
    write_json(&outcome, output)
}

/// Rank records against a query vector and write the result JSON.
pub fn handle_rank(
    records_path: &str,
    query_vector_path: &str,
    query_text: &str,
    limit: usize,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let records: Vec<MemoryRecord> = serde_json::from_str(
        &fs::read_to_string(records_path)
            .with_context(|| format!("Failed to read {records_path}"))?,
    )
    .context("Records file is not a memory-record array")?;

    let query_vector: Vec<f32> = serde_json::from_str(
        &fs::read_to_string(query_vector_path)
            .with_context(|| format!("Failed to read {query_vector_path}"))?,
    )
    .context("Query vector file is not a float array")?;

    let ranked = SimilarityRanker::new().rank(&records, &query_vector, query_text, limit);
    info!(returned = ranked.len(), "Ranking complete");
    write_json(&ranked, output)
}

/// Report topic coverage of records against a topic map.
pub fn handle_coverage(
    records_path: &str,
    topics_path: &str,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let records: Vec<MemoryRecord> = serde_json::from_str(
        &fs::read_to_string(records_path)
            .with_context(|| format!("Failed to read {records_path}"))?,
    )
    .context("Records file is not a memory-record array")?;

    let topics: TopicMap = serde_json::from_str(
        &fs::read_to_string(topics_path)
            .with_context(|| format!("Failed to read {topics_path}"))?,
    )
    .context("Topics file is not a [topic, keywords] array")?;

    let report = analyze_coverage(&records, &topics);
    write_json(&report, output)
}

/// Serialize to pretty JSON, to a file or stdout.
fn write_json<T: serde::Serialize>(value: &T, output: Option<&str>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {path}"))?
        }
        None => println!("{json}"),
    }
    Ok(())
}
