//! Partition clustering.
//!
//! Centroid-based k-means over the full vector matrix. Data volume picks
//! the variant: the full iterative algorithm with seeded random restarts,
//! or an incremental mini-batch pass above the large-input threshold.
//! Angular similarity is handled by L2-normalizing rows first, which makes
//! Euclidean distance on the normalized vectors rank identically to cosine
//! distance.

use linfa::dataset::AsTargets;
use linfa::traits::{Fit, FitWith, Predict};
use linfa::DatasetBase;
use linfa_clustering::{IncrKMeansError, KMeans};
use ndarray::{Array2, Axis};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use tracing::{debug, info, warn};

use recall_types::{Cluster, ClusterCollection, ClusterError, RecordId};

use crate::config::PartitionConfig;
use crate::matrix::VectorMatrix;

/// Simplified-retry cluster count, mirroring the reference behavior.
const RETRY_K: usize = 5;

/// Cluster the matrix into (at most) `k` groups.
///
/// A failure of the primary attempt triggers one retry with a simplified
/// configuration: fixed small k, a single restart, no normalization. If
/// the retry also fails the caller receives `ClusteringFailed` carrying
/// both causes; there is no silent empty result.
pub fn partition(
    matrix: &VectorMatrix,
    k: usize,
    config: &PartitionConfig,
    use_cosine: bool,
    seed: u64,
) -> Result<ClusterCollection, ClusterError> {
    let space = if use_cosine {
        normalize_rows(&matrix.data)
    } else {
        matrix.data.clone()
    };

    let (labels, centroids) = match run_kmeans(&space, k, config, seed) {
        Ok(result) => result,
        Err(primary) => {
            warn!(error = %primary, "Primary clustering attempt failed, retrying simplified");
            let simplified = PartitionConfig {
                n_runs: 1,
                ..config.clone()
            };
            let retry_k = RETRY_K.min(matrix.len());
            match run_kmeans(&matrix.data, retry_k, &simplified, seed) {
                Ok(result) => result,
                Err(retry) => {
                    return Err(ClusterError::ClusteringFailed { primary, retry });
                }
            }
        }
    };

    Ok(collect_clusters(matrix, &labels, &centroids))
}

/// Run the appropriate k-means variant, returning per-row labels and the
/// centroid matrix. Errors are returned as strings so the caller can
/// attach them as failure causes.
pub(crate) fn run_kmeans(
    data: &Array2<f64>,
    k: usize,
    config: &PartitionConfig,
    seed: u64,
) -> Result<(Vec<usize>, Array2<f64>), String> {
    if k < 1 || k > data.nrows() {
        return Err(format!(
            "cluster count {k} out of range for {} records",
            data.nrows()
        ));
    }

    if data.nrows() > config.minibatch_threshold {
        run_minibatch_kmeans(data, k, config, seed)
    } else {
        run_full_kmeans(data, k, config, seed)
    }
}

/// Full Lloyd's-style algorithm with seeded restarts; lowest inertia wins.
fn run_full_kmeans(
    data: &Array2<f64>,
    k: usize,
    config: &PartitionConfig,
    seed: u64,
) -> Result<(Vec<usize>, Array2<f64>), String> {
    debug!(n = data.nrows(), k, runs = config.n_runs, "Running full k-means");
    let rng = Xoshiro256Plus::seed_from_u64(seed);
    let dataset = DatasetBase::from(data.clone());

    let model = KMeans::params_with_rng(k, rng)
        .n_runs(config.n_runs)
        .max_n_iterations(config.max_iterations)
        .tolerance(config.tolerance)
        .fit(&dataset)
        .map_err(|e| format!("k-means fit failed: {e}"))?;

    let labels: Vec<usize> = model
        .predict(&dataset)
        .as_targets()
        .iter()
        .copied()
        .collect();
    Ok((labels, model.centroids().to_owned()))
}

/// Incremental mini-batch variant with a capped epoch count, for inputs
/// too large to afford full restarts.
fn run_minibatch_kmeans(
    data: &Array2<f64>,
    k: usize,
    config: &PartitionConfig,
    seed: u64,
) -> Result<(Vec<usize>, Array2<f64>), String> {
    info!(
        n = data.nrows(),
        k,
        batch_size = config.batch_size,
        "Running incremental mini-batch k-means"
    );
    let rng = Xoshiro256Plus::seed_from_u64(seed);
    let params = KMeans::params_with_rng(k, rng).tolerance(config.tolerance);

    let mut model = None;
    'epochs: for _ in 0..config.minibatch_max_epochs {
        for batch in data.axis_chunks_iter(Axis(0), config.batch_size) {
            // Batches smaller than k cannot update every centroid; skip the
            // tail remainder rather than feed a degenerate batch.
            if batch.nrows() < k {
                continue;
            }
            let batch_ds = DatasetBase::from(batch.to_owned());
            match params.fit_with(model.take(), &batch_ds) {
                Ok(converged) => {
                    model = Some(converged);
                    break 'epochs;
                }
                Err(IncrKMeansError::NotConverged(partial)) => model = Some(partial),
                Err(err) => return Err(format!("mini-batch k-means failed: {err}")),
            }
        }
    }

    let model = model.ok_or_else(|| "mini-batch k-means produced no model".to_string())?;
    let dataset = DatasetBase::from(data.clone());
    let labels: Vec<usize> = model
        .predict(&dataset)
        .as_targets()
        .iter()
        .copied()
        .collect();
    Ok((labels, model.centroids().to_owned()))
}

/// Group labeled rows into clusters, dropping any cluster that ended up
/// with zero members (the output count may be below k).
fn collect_clusters(
    matrix: &VectorMatrix,
    labels: &[usize],
    centroids: &Array2<f64>,
) -> ClusterCollection {
    let n = matrix.len();
    let mut members: Vec<Vec<RecordId>> = vec![Vec::new(); centroids.nrows()];
    for (row, &label) in labels.iter().enumerate() {
        members[label].push(matrix.ids[row].clone());
    }

    let mut clusters = Vec::new();
    for (label, ids) in members.into_iter().enumerate() {
        if ids.is_empty() {
            debug!(label, "Dropping empty cluster");
            continue;
        }
        let centroid: Vec<f32> = centroids
            .index_axis(Axis(0), label)
            .iter()
            .map(|&v| v as f32)
            .collect();
        let relevance = ids.len() as f32 / n as f32;
        let mut cluster = Cluster::new(ids).with_centroid(centroid);
        cluster.relevance = relevance;
        clusters.push(cluster);
    }

    ClusterCollection::new(clusters, matrix.ids.clone())
}

/// L2-normalize every row; zero rows are left untouched.
pub fn normalize_rows(data: &Array2<f64>) -> Array2<f64> {
    let mut out = data.clone();
    for mut row in out.rows_mut() {
        let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            row.mapv_inplace(|x| x / norm);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_types::VectorRecord;
    use std::collections::HashSet;

    use crate::matrix::build_matrix;

    fn blob_matrix() -> VectorMatrix {
        // Two obvious groups around (0,0) and (10,10)
        let vectors = vec![
            vec![0.0, 0.1],
            vec![0.1, 0.0],
            vec![0.2, 0.1],
            vec![10.0, 10.1],
            vec![10.1, 10.0],
            vec![10.2, 10.1],
        ];
        let records: Vec<VectorRecord> = vectors
            .into_iter()
            .enumerate()
            .map(|(i, v)| VectorRecord::new(format!("m{i}"), v))
            .collect();
        build_matrix(&records).unwrap()
    }

    #[test]
    fn test_partition_covers_every_id_exactly_once() {
        let matrix = blob_matrix();
        let collection = partition(&matrix, 2, &PartitionConfig::default(), false, 42).unwrap();

        let mut seen = HashSet::new();
        for cluster in &collection.clusters {
            assert!(!cluster.is_empty());
            for id in &cluster.member_ids {
                assert!(seen.insert(id.clone()), "id {id} assigned twice");
            }
        }
        assert_eq!(seen.len(), matrix.len());
    }

    #[test]
    fn test_partition_separates_blobs() {
        let matrix = blob_matrix();
        let collection = partition(&matrix, 2, &PartitionConfig::default(), false, 42).unwrap();
        assert_eq!(collection.clusters.len(), 2);

        let near: HashSet<&str> = ["m0", "m1", "m2"].into_iter().collect();
        for cluster in &collection.clusters {
            let in_near = cluster
                .member_ids
                .iter()
                .filter(|id| near.contains(id.as_str()))
                .count();
            assert!(in_near == 0 || in_near == cluster.len());
        }
    }

    #[test]
    fn test_partition_deterministic_across_calls() {
        let matrix = blob_matrix();
        let config = PartitionConfig::default();
        let a = partition(&matrix, 2, &config, true, 42).unwrap();
        let b = partition(&matrix, 2, &config, true, 42).unwrap();

        let members =
            |c: &ClusterCollection| -> Vec<Vec<RecordId>> { c.clusters.iter().map(|cl| cl.member_ids.clone()).collect() };
        assert_eq!(members(&a), members(&b));
    }

    #[test]
    fn test_cosine_groups_by_direction_not_magnitude() {
        // Same direction at different magnitudes vs an orthogonal direction
        let records = vec![
            VectorRecord::new("a1", vec![1.0, 0.0]),
            VectorRecord::new("a2", vec![100.0, 0.0]),
            VectorRecord::new("b1", vec![0.0, 1.0]),
            VectorRecord::new("b2", vec![0.0, 80.0]),
        ];
        let matrix = build_matrix(&records).unwrap();
        let collection = partition(&matrix, 2, &PartitionConfig::default(), true, 42).unwrap();

        for cluster in &collection.clusters {
            let a_count = cluster
                .member_ids
                .iter()
                .filter(|id| id.starts_with('a'))
                .count();
            assert!(a_count == 0 || a_count == cluster.len());
        }
    }

    #[test]
    fn test_out_of_range_k_reported_not_panicking() {
        let matrix = blob_matrix();
        let err = run_kmeans(&matrix.data, 100, &PartitionConfig::default(), 42).unwrap_err();
        assert!(err.contains("out of range"));
    }

    #[test]
    fn test_normalize_rows_unit_length() {
        let data = Array2::from_shape_vec((2, 2), vec![3.0, 4.0, 0.0, 0.0]).unwrap();
        let out = normalize_rows(&data);
        let norm0 = (out[[0, 0]].powi(2) + out[[0, 1]].powi(2)).sqrt();
        assert!((norm0 - 1.0).abs() < 1e-9);
        // Zero row untouched
        assert_eq!(out[[1, 0]], 0.0);
        assert_eq!(out[[1, 1]], 0.0);
    }
}
