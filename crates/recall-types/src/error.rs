//! Error taxonomy for the clustering engine.

use thiserror::Error;

/// Errors surfaced by the clustering engine.
///
/// `ClusterCountSelector` never raises (it recovers locally with fallback
/// formulas); the partition clusterer retries once with a simplified
/// configuration before surfacing `ClusteringFailed` with both causes.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// Fewer than two records, or no usable vectors and no timestamps
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Vectors of unequal length reached the clusterer within one batch
    #[error("Dimension mismatch: record {record_id} has {found} components, expected {expected}")]
    DimensionMismatch {
        /// Dimension established by the first record in the batch
        expected: usize,
        /// Dimension actually found
        found: usize,
        /// Offending record
        record_id: String,
    },

    /// Both the primary attempt and the simplified retry failed
    #[error("Clustering failed: {primary}; simplified retry also failed: {retry}")]
    ClusteringFailed {
        /// Cause of the primary attempt's failure
        primary: String,
        /// Cause of the simplified retry's failure
        retry: String,
    },

    /// Malformed input that is not a dimension or cardinality problem
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
