//! Vector preprocessing.
//!
//! Turns raw `{id, vector}` pairs into a uniform numeric matrix and
//! bounds the cost of downstream stages through PCA and even-spaced
//! subsampling. Input records are never mutated.

use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_reduction::Pca;
use ndarray::{Array2, Axis};
use tracing::{debug, warn};

use recall_types::{ClusterError, RecordId, VectorRecord};

use crate::config::PreprocessConfig;

/// A uniform numeric matrix with its id-order mapping.
///
/// Row `i` of `data` is the vector of `ids[i]`.
#[derive(Debug, Clone)]
pub struct VectorMatrix {
    /// Row-per-record matrix, widened to f64 for the numeric pipeline
    pub data: Array2<f64>,
    /// Record ids in row order
    pub ids: Vec<RecordId>,
}

impl VectorMatrix {
    /// Number of records (rows).
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    /// Whether the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Vector dimension (columns).
    pub fn dimension(&self) -> usize {
        self.data.ncols()
    }
}

/// Build a matrix from vector records, enforcing the uniform-dimension
/// contract.
///
/// Fewer than two records is `InsufficientData`; a record whose length
/// differs from the first is `DimensionMismatch` (reported, not indexed
/// out of bounds).
pub fn build_matrix(records: &[VectorRecord]) -> Result<VectorMatrix, ClusterError> {
    if records.len() < 2 {
        return Err(ClusterError::InsufficientData(format!(
            "need at least 2 vectors to cluster, got {}",
            records.len()
        )));
    }

    let dim = records[0].dimension();
    if dim == 0 {
        return Err(ClusterError::InvalidInput(format!(
            "record {} has an empty vector",
            records[0].id
        )));
    }

    for record in records {
        if record.dimension() != dim {
            return Err(ClusterError::DimensionMismatch {
                expected: dim,
                found: record.dimension(),
                record_id: record.id.clone(),
            });
        }
    }

    let mut data = Array2::zeros((records.len(), dim));
    for (i, record) in records.iter().enumerate() {
        for (j, &val) in record.vector.iter().enumerate() {
            data[[i, j]] = f64::from(val);
        }
    }

    Ok(VectorMatrix {
        data,
        ids: records.iter().map(|r| r.id.clone()).collect(),
    })
}

/// Reduce dimensionality with PCA when the vectors are wider than the
/// configured threshold.
///
/// The projection is fit on the current batch. The component count is
/// capped at N-1 (a batch cannot support more). On a numerical failure
/// the raw matrix is returned unchanged.
pub fn reduce_dimensions(data: &Array2<f64>, config: &PreprocessConfig) -> Array2<f64> {
    let (n, dim) = (data.nrows(), data.ncols());
    if dim <= config.high_dim_threshold {
        return data.clone();
    }

    let components = config.pca_components.min(n.saturating_sub(1));
    if components < 2 {
        return data.clone();
    }

    debug!(from = dim, to = components, "Applying PCA reduction");
    let dataset = DatasetBase::from(data.clone());
    match Pca::params(components).fit(&dataset) {
        Ok(pca) => {
            let reduced = pca.predict(dataset);
            reduced.records().to_owned()
        }
        Err(err) => {
            warn!(error = %err, "PCA reduction failed, using raw vectors");
            data.clone()
        }
    }
}

/// Draw an evenly spaced subsample of at most `ceiling` rows.
///
/// Even spacing preserves ordering-correlated structure (temporal drift)
/// without biasing toward either end, which random sampling cannot
/// promise. Used for count selection only; the full set still gets
/// clustered.
pub fn evenly_spaced_sample(data: &Array2<f64>, ceiling: usize) -> Array2<f64> {
    let n = data.nrows();
    if n <= ceiling || ceiling == 0 {
        return data.clone();
    }

    debug!(from = n, to = ceiling, "Subsampling for count selection");
    let step = (n - 1) as f64 / (ceiling - 1) as f64;
    let indices: Vec<usize> = (0..ceiling).map(|i| (i as f64 * step) as usize).collect();
    data.select(Axis(0), &indices)
}
