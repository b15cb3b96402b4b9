//! # recall-clustering
//!
//! Adaptive vector clustering and topic merging for the recall memory
//! system.
//!
//! Given a snapshot of `{id, vector}` pairs the engine decides how many
//! clusters to form, runs a partition pass with a metric and algorithm
//! suited to the data scale, collapses near-duplicate clusters, and names
//! the survivors. When embeddings are unusable a temporal fallback
//! buckets records by timestamp instead.
//!
//! ## Features
//! - Tiered cluster-count selection with silhouette-scored sweeps
//! - Full k-means with seeded restarts, mini-batch variant at scale
//! - PCA reduction and even-spaced subsampling to bound cost
//! - Jaccard merging of overlapping clusters
//! - Deterministic output for identical input and configuration

pub mod config;
pub mod engine;
pub mod kselect;
pub mod matrix;
pub mod merge;
pub mod partition;
pub mod silhouette;
pub mod temporal;

pub use config::{
    EngineConfig, MergeConfig, PartitionConfig, PreprocessConfig, SelectionConfig, TemporalConfig,
};
pub use engine::{ClusterRequest, ClusteringEngine};
pub use kselect::select_k;
pub use matrix::{build_matrix, VectorMatrix};
pub use merge::{jaccard, merge_overlapping};
pub use partition::partition;
pub use silhouette::mean_silhouette;
pub use temporal::cluster_by_time;
