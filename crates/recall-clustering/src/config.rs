//! Engine configuration.
//!
//! Every tunable of the clustering pipeline lives here with the reference
//! defaults. All thresholds are plain data so a caller (or the CLI via a
//! TOML file) can override them without touching engine code.

use recall_topics::KeywordConfig;
use serde::{Deserialize, Serialize};

/// Master configuration for the clustering engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Use angular (cosine) distance by L2-normalizing vectors first;
    /// raw Euclidean otherwise
    #[serde(default = "default_true")]
    pub use_cosine: bool,

    /// Seed for every stochastic step; fixed so identical input yields
    /// identical output
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Preprocessing settings
    #[serde(default)]
    pub preprocess: PreprocessConfig,

    /// Cluster-count selection settings
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Partition clustering settings
    #[serde(default)]
    pub partition: PartitionConfig,

    /// Cluster merge settings
    #[serde(default)]
    pub merge: MergeConfig,

    /// Temporal fallback settings
    #[serde(default)]
    pub temporal: TemporalConfig,

    /// Keyword extraction settings for cluster annotation
    #[serde(default)]
    pub keywords: KeywordConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            use_cosine: default_true(),
            seed: default_seed(),
            preprocess: PreprocessConfig::default(),
            selection: SelectionConfig::default(),
            partition: PartitionConfig::default(),
            merge: MergeConfig::default(),
            temporal: TemporalConfig::default(),
            keywords: KeywordConfig::default(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_seed() -> u64 {
    42
}

/// Vector preprocessing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Apply PCA when the vector dimension exceeds this
    #[serde(default = "default_high_dim_threshold")]
    pub high_dim_threshold: usize,

    /// Number of PCA components to keep (capped at N-1 for small batches)
    #[serde(default = "default_pca_components")]
    pub pca_components: usize,

    /// Evenly-spaced subsample ceiling for count selection
    #[serde(default = "default_sample_ceiling")]
    pub sample_ceiling: usize,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            high_dim_threshold: default_high_dim_threshold(),
            pca_components: default_pca_components(),
            sample_ceiling: default_sample_ceiling(),
        }
    }
}

fn default_high_dim_threshold() -> usize {
    100
}
fn default_pca_components() -> usize {
    100
}
fn default_sample_ceiling() -> usize {
    1000
}

/// Cluster-count selection configuration (tiered policy).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Below this record count the tiny tier applies
    #[serde(default = "default_tiny_threshold")]
    pub tiny_threshold: usize,

    /// At or above this record count the huge tier applies
    #[serde(default = "default_huge_threshold")]
    pub huge_threshold: usize,

    /// Huge tier: one cluster per this many records
    #[serde(default = "default_records_per_cluster")]
    pub records_per_cluster: usize,

    /// Huge tier: cluster-count floor
    #[serde(default = "default_huge_min_clusters")]
    pub huge_min_clusters: usize,

    /// Huge tier: cluster-count ceiling
    #[serde(default = "default_huge_max_clusters")]
    pub huge_max_clusters: usize,

    /// Mid tier: smallest candidate k in the silhouette sweep
    #[serde(default = "default_sweep_min")]
    pub sweep_min: usize,

    /// Mid tier: largest candidate k in the silhouette sweep
    #[serde(default = "default_sweep_max")]
    pub sweep_max: usize,

    /// Above this many points the silhouette uses a stratified subsample
    #[serde(default = "default_silhouette_sample_threshold")]
    pub silhouette_sample_threshold: usize,

    /// Stratified subsample cap per cluster
    #[serde(default = "default_silhouette_per_cluster_cap")]
    pub silhouette_per_cluster_cap: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            tiny_threshold: default_tiny_threshold(),
            huge_threshold: default_huge_threshold(),
            records_per_cluster: default_records_per_cluster(),
            huge_min_clusters: default_huge_min_clusters(),
            huge_max_clusters: default_huge_max_clusters(),
            sweep_min: default_sweep_min(),
            sweep_max: default_sweep_max(),
            silhouette_sample_threshold: default_silhouette_sample_threshold(),
            silhouette_per_cluster_cap: default_silhouette_per_cluster_cap(),
        }
    }
}

fn default_tiny_threshold() -> usize {
    20
}
fn default_huge_threshold() -> usize {
    400
}
fn default_records_per_cluster() -> usize {
    50
}
fn default_huge_min_clusters() -> usize {
    30
}
fn default_huge_max_clusters() -> usize {
    40
}
fn default_sweep_min() -> usize {
    3
}
fn default_sweep_max() -> usize {
    40
}
fn default_silhouette_sample_threshold() -> usize {
    5000
}
fn default_silhouette_per_cluster_cap() -> usize {
    100
}

/// Partition clustering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionConfig {
    /// Above this many records the incremental mini-batch variant runs
    #[serde(default = "default_minibatch_threshold")]
    pub minibatch_threshold: usize,

    /// Mini-batch size
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Mini-batch epoch cap
    #[serde(default = "default_minibatch_max_epochs")]
    pub minibatch_max_epochs: usize,

    /// Random restarts for the full algorithm; lowest inertia wins
    #[serde(default = "default_n_runs")]
    pub n_runs: usize,

    /// Iteration cap for the full algorithm
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u64,

    /// Convergence tolerance on centroid movement
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            minibatch_threshold: default_minibatch_threshold(),
            batch_size: default_batch_size(),
            minibatch_max_epochs: default_minibatch_max_epochs(),
            n_runs: default_n_runs(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
        }
    }
}

fn default_minibatch_threshold() -> usize {
    10_000
}
fn default_batch_size() -> usize {
    1000
}
fn default_minibatch_max_epochs() -> usize {
    100
}
fn default_n_runs() -> usize {
    10
}
fn default_max_iterations() -> u64 {
    300
}
fn default_tolerance() -> f64 {
    1e-4
}

/// Cluster merge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Member-set Jaccard similarity above which two clusters merge
    #[serde(default = "default_merge_threshold")]
    pub threshold: f32,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            threshold: default_merge_threshold(),
        }
    }
}

fn default_merge_threshold() -> f32 {
    0.5
}

/// Temporal fallback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalConfig {
    /// Upper bound on bucket count
    #[serde(default = "default_max_buckets")]
    pub max_buckets: usize,

    /// Records per bucket used to scale the bucket count
    #[serde(default = "default_records_per_bucket")]
    pub records_per_bucket: usize,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            max_buckets: default_max_buckets(),
            records_per_bucket: default_records_per_bucket(),
        }
    }
}

fn default_max_buckets() -> usize {
    10
}
fn default_records_per_bucket() -> usize {
    10
}
