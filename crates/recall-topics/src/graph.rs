//! Semantic links between topic clusters.
//!
//! The knowledge-graph builder consumes these links to connect topics
//! whose centroids sit close together in embedding space. Clusters from
//! the temporal fallback carry no centroid and never link.

use serde::{Deserialize, Serialize};
use tracing::debug;

use recall_types::Cluster;

use crate::similarity::cosine_similarity;

/// An undirected semantic edge between two topic clusters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticLink {
    /// Cluster id of one endpoint
    pub source_id: String,
    /// Cluster id of the other endpoint
    pub target_id: String,
    /// Centroid cosine similarity, in (threshold, 1.0]
    pub strength: f32,
}

/// Build semantic links between every pair of clusters whose centroid
/// cosine similarity exceeds `threshold`.
///
/// Pairs are visited in discovery order; each unordered pair yields at
/// most one link.
pub fn build_semantic_links(clusters: &[Cluster], threshold: f32) -> Vec<SemanticLink> {
    let mut links = Vec::new();

    for (i, a) in clusters.iter().enumerate() {
        let Some(centroid_a) = a.centroid.as_deref() else {
            continue;
        };
        for b in clusters.iter().skip(i + 1) {
            let Some(centroid_b) = b.centroid.as_deref() else {
                continue;
            };
            let strength = cosine_similarity(centroid_a, centroid_b);
            if strength > threshold {
                links.push(SemanticLink {
                    source_id: a.cluster_id.clone(),
                    target_id: b.cluster_id.clone(),
                    strength,
                });
            }
        }
    }

    debug!(
        link_count = links.len(),
        cluster_count = clusters.len(),
        "Built semantic topic links"
    );
    links
}
