//! Topic cluster types.
//!
//! One clustering invocation produces a `ClusterCollection`: a partition of
//! the input record ids into clusters, each annotated with a centroid (when
//! vector geometry was available), keywords, and a topic name.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::record::RecordId;

/// A semantically coherent group of memory records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    /// Unique identifier (ULID)
    pub cluster_id: String,

    /// Mean vector of the members in clustering space; `None` for clusters
    /// produced by the temporal fallback, where no geometry exists
    #[serde(rename = "center")]
    pub centroid: Option<Vec<f32>>,

    /// Ids of member records; non-empty, no duplicates
    pub member_ids: Vec<RecordId>,

    /// Accumulated relevance; merging sums the scores of both sides
    pub relevance: f32,

    /// Keywords describing the cluster, highest weight first
    pub keywords: Vec<String>,

    /// Human-readable topic name derived from the top keywords
    pub topic_name: String,
}

impl Cluster {
    /// Create a cluster with a fresh ULID and default annotations.
    pub fn new(member_ids: Vec<RecordId>) -> Self {
        Self {
            cluster_id: Ulid::new().to_string(),
            centroid: None,
            member_ids,
            relevance: 0.0,
            keywords: Vec::new(),
            topic_name: String::new(),
        }
    }

    /// Attach a centroid vector.
    pub fn with_centroid(mut self, centroid: Vec<f32>) -> Self {
        self.centroid = Some(centroid);
        self
    }

    /// Number of member records.
    pub fn len(&self) -> usize {
        self.member_ids.len()
    }

    /// Whether the cluster has no members.
    pub fn is_empty(&self) -> bool {
        self.member_ids.is_empty()
    }
}

/// The full output of one clustering pass: clusters plus the originating
/// record-id universe.
///
/// Invariant: the union of all `member_ids` equals `record_ids`, and after
/// merging no id appears in two clusters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterCollection {
    /// Clusters in discovery order
    pub clusters: Vec<Cluster>,

    /// Every record id that entered the clustering pass
    pub record_ids: Vec<RecordId>,
}

impl ClusterCollection {
    /// Create a collection from clusters and the input id universe.
    pub fn new(clusters: Vec<Cluster>, record_ids: Vec<RecordId>) -> Self {
        Self {
            clusters,
            record_ids,
        }
    }

    /// Total members across all clusters.
    pub fn member_count(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }
}

/// Which clustering path produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackKind {
    /// The embedding-driven partition path
    Vector,
    /// The timestamp-bucket fallback
    Temporal,
}

impl std::fmt::Display for FallbackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackKind::Vector => write!(f, "vector"),
            FallbackKind::Temporal => write!(f, "temporal"),
        }
    }
}

/// Caller-facing result of one clustering invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterOutcome {
    /// Named topic clusters
    pub clusters: Vec<Cluster>,

    /// The originating record-id universe
    pub record_ids: Vec<RecordId>,

    /// Which path produced the clusters
    pub fallback_used: FallbackKind,
}

impl ClusterOutcome {
    /// Assemble an outcome from a merged collection.
    pub fn from_collection(collection: ClusterCollection, fallback_used: FallbackKind) -> Self {
        Self {
            clusters: collection.clusters,
            record_ids: collection.record_ids,
            fallback_used,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_new() {
        let cluster = Cluster::new(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(cluster.len(), 2);
        assert!(!cluster.is_empty());
        assert!(cluster.centroid.is_none());
        assert!(cluster.topic_name.is_empty());
    }

    #[test]
    fn test_cluster_ids_unique() {
        let a = Cluster::new(vec!["x".to_string()]);
        let b = Cluster::new(vec!["x".to_string()]);
        assert_ne!(a.cluster_id, b.cluster_id);
    }

    #[test]
    fn test_centroid_serializes_as_center() {
        let cluster = Cluster::new(vec!["a".to_string()]).with_centroid(vec![1.0, 0.0]);
        let json = serde_json::to_string(&cluster).unwrap();
        assert!(json.contains("\"center\""));
        assert!(!json.contains("\"centroid\""));
    }

    #[test]
    fn test_fallback_kind_serde() {
        assert_eq!(
            serde_json::to_string(&FallbackKind::Vector).unwrap(),
            "\"vector\""
        );
        assert_eq!(
            serde_json::to_string(&FallbackKind::Temporal).unwrap(),
            "\"temporal\""
        );
    }

    #[test]
    fn test_collection_member_count() {
        let clusters = vec![
            Cluster::new(vec!["a".to_string(), "b".to_string()]),
            Cluster::new(vec!["c".to_string()]),
        ];
        let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let collection = ClusterCollection::new(clusters, ids);
        assert_eq!(collection.member_count(), 3);
    }

    #[test]
    fn test_outcome_from_collection() {
        let collection = ClusterCollection::new(
            vec![Cluster::new(vec!["a".to_string()])],
            vec!["a".to_string()],
        );
        let outcome = ClusterOutcome::from_collection(collection, FallbackKind::Temporal);
        assert_eq!(outcome.fallback_used, FallbackKind::Temporal);
        assert_eq!(outcome.clusters.len(), 1);
    }
}
