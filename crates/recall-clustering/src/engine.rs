//! The clustering engine.
//!
//! One engine instance holds the configuration and drives the pipeline:
//! preprocess, pick k, partition, merge, name. There is no shared mutable
//! state across invocations; concurrent calls on separate inputs need no
//! locking. Construction is explicit; callers pass the engine where they
//! need it.

use std::collections::HashMap;

use tracing::{info, warn};

use recall_topics::KeywordExtractor;
use recall_types::{
    ClusterCollection, ClusterError, ClusterOutcome, FallbackKind, MemoryRecord, VectorRecord,
};

use crate::config::EngineConfig;
use crate::{kselect, matrix, merge, partition, temporal};

/// Per-invocation options from the caller (§ input contract).
#[derive(Debug, Clone, Default)]
pub struct ClusterRequest {
    /// Requested cluster count, reconciled with the automatic selection
    /// by harmonic mean
    pub n_clusters: Option<usize>,

    /// Override the configured distance metric for this call
    pub use_cosine: Option<bool>,
}

/// Synchronous clustering engine.
pub struct ClusteringEngine {
    config: EngineConfig,
    extractor: KeywordExtractor,
}

impl ClusteringEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        let extractor = KeywordExtractor::new(config.keywords.clone());
        Self { config, extractor }
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Cluster bare `{id, vector}` pairs.
    ///
    /// This is the wire-contract entry point: no text is available, so
    /// clusters get placeholder topic names.
    pub fn cluster_vectors(
        &self,
        records: &[VectorRecord],
        request: &ClusterRequest,
    ) -> Result<ClusterOutcome, ClusterError> {
        let collection = self.vector_pipeline(records, request, &HashMap::new())?;
        Ok(ClusterOutcome::from_collection(
            collection,
            FallbackKind::Vector,
        ))
    }

    /// Cluster full memory records.
    ///
    /// Takes the vector path when at least two records carry usable
    /// embeddings; otherwise buckets every record by timestamp.
    pub fn cluster_memories(
        &self,
        records: &[MemoryRecord],
        request: &ClusterRequest,
    ) -> Result<ClusterOutcome, ClusterError> {
        if records.is_empty() {
            return Err(ClusterError::InsufficientData(
                "no records supplied".to_string(),
            ));
        }

        let embedded: Vec<VectorRecord> =
            records.iter().filter_map(|r| r.vector_record()).collect();

        if embedded.len() < 2 {
            info!(
                total = records.len(),
                embedded = embedded.len(),
                "Too few usable embeddings, using temporal fallback"
            );
            let collection =
                temporal::cluster_by_time(records, &self.config.temporal, &self.extractor)?;
            return Ok(ClusterOutcome::from_collection(
                collection,
                FallbackKind::Temporal,
            ));
        }

        if embedded.len() < records.len() {
            warn!(
                skipped = records.len() - embedded.len(),
                "Records without embeddings excluded from the vector clustering pass"
            );
        }

        let by_id: HashMap<&str, &MemoryRecord> =
            records.iter().map(|r| (r.id.as_str(), r)).collect();
        let collection = self.vector_pipeline(&embedded, request, &by_id)?;
        Ok(ClusterOutcome::from_collection(
            collection,
            FallbackKind::Vector,
        ))
    }

    /// Preprocess → select k → partition → annotate keywords → merge.
    fn vector_pipeline(
        &self,
        records: &[VectorRecord],
        request: &ClusterRequest,
        by_id: &HashMap<&str, &MemoryRecord>,
    ) -> Result<ClusterCollection, ClusterError> {
        let matrix = matrix::build_matrix(records)?;
        let k = kselect::select_k(&matrix.data, &self.config, request.n_clusters);
        let use_cosine = request.use_cosine.unwrap_or(self.config.use_cosine);

        info!(
            n = matrix.len(),
            dimension = matrix.dimension(),
            k,
            use_cosine,
            "Clustering vector batch"
        );

        let mut collection = partition::partition(
            &matrix,
            k,
            &self.config.partition,
            use_cosine,
            self.config.seed,
        )?;

        if !by_id.is_empty() {
            for cluster in &mut collection.clusters {
                cluster.keywords = self.cluster_keywords(&cluster.member_ids, by_id);
            }
        }

        Ok(merge::merge_overlapping(collection, &self.config.merge))
    }

    /// Keywords for one cluster: lexical extraction over member content,
    /// with pre-extracted record keywords as the backstop.
    fn cluster_keywords(
        &self,
        member_ids: &[String],
        by_id: &HashMap<&str, &MemoryRecord>,
    ) -> Vec<String> {
        let contents: Vec<&str> = member_ids
            .iter()
            .filter_map(|id| by_id.get(id.as_str()))
            .map(|r| r.content.as_str())
            .collect();

        let mut keywords = self.extractor.extract(&contents);
        if keywords.is_empty() {
            for id in member_ids {
                if let Some(record) = by_id.get(id.as_str()) {
                    for keyword in &record.keywords {
                        if !keywords.contains(keyword) {
                            keywords.push(keyword.clone());
                        }
                    }
                }
            }
        }
        keywords
    }
}

impl Default for ClusteringEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
