//! Silhouette scoring for trial partitionings.
//!
//! The silhouette coefficient is a per-point score in [-1, 1] measuring
//! how much closer a point sits to its own cluster than to the
//! next-nearest one. The partition score is the mean over all points, or
//! over a stratified per-cluster subsample when the trial set is large.

use ndarray::{Array2, ArrayView1, Axis};
use rand::seq::SliceRandom;
use rand_xoshiro::Xoshiro256Plus;

use crate::config::SelectionConfig;

/// Score a labeling of `data`, subsampling per the configuration when the
/// point count exceeds the silhouette threshold.
///
/// Returns `None` when the labeling has fewer than two distinct clusters
/// (the coefficient is undefined there).
pub fn score_partition(
    data: &Array2<f64>,
    labels: &[usize],
    config: &SelectionConfig,
    rng: &mut Xoshiro256Plus,
) -> Option<f64> {
    if data.nrows() <= config.silhouette_sample_threshold {
        return mean_silhouette(data, labels);
    }

    // Stratified subsample: up to the cap from every cluster, so small
    // clusters keep their say in the score.
    let cluster_count = labels.iter().max().map_or(0, |&m| m + 1);
    let mut by_cluster: Vec<Vec<usize>> = vec![Vec::new(); cluster_count];
    for (idx, &label) in labels.iter().enumerate() {
        by_cluster[label].push(idx);
    }

    let mut sample_indices = Vec::new();
    for members in by_cluster.iter_mut() {
        if members.len() > config.silhouette_per_cluster_cap {
            members.shuffle(rng);
            members.truncate(config.silhouette_per_cluster_cap);
        }
        sample_indices.extend_from_slice(members);
    }

    if sample_indices.len() < 2 {
        return None;
    }

    let sample_data = data.select(Axis(0), &sample_indices);
    let sample_labels: Vec<usize> = sample_indices.iter().map(|&i| labels[i]).collect();
    mean_silhouette(&sample_data, &sample_labels)
}

/// Mean silhouette coefficient over every point.
pub fn mean_silhouette(data: &Array2<f64>, labels: &[usize]) -> Option<f64> {
    let n = data.nrows();
    if n != labels.len() || n < 2 {
        return None;
    }

    let cluster_count = labels.iter().max().map_or(0, |&m| m + 1);
    let distinct = {
        let mut seen = vec![false; cluster_count];
        for &label in labels {
            seen[label] = true;
        }
        seen.iter().filter(|&&s| s).count()
    };
    if distinct < 2 {
        return None;
    }

    let mut total = 0.0;
    for i in 0..n {
        let point = data.row(i);
        let own = labels[i];

        // Mean distance to every cluster, tracked in one pass
        let mut dist_sum = vec![0.0f64; cluster_count];
        let mut counts = vec![0usize; cluster_count];
        for j in 0..n {
            if i == j {
                continue;
            }
            dist_sum[labels[j]] += euclidean(point, data.row(j));
            counts[labels[j]] += 1;
        }

        let a = if counts[own] > 0 {
            dist_sum[own] / counts[own] as f64
        } else {
            0.0
        };

        let b = (0..cluster_count)
            .filter(|&c| c != own && counts[c] > 0)
            .map(|c| dist_sum[c] / counts[c] as f64)
            .fold(f64::INFINITY, f64::min);

        let b = if b.is_finite() { b } else { 0.0 };
        let denom = a.max(b);
        total += if denom > 0.0 { (b - a) / denom } else { 0.0 };
    }

    Some(total / n as f64)
}

fn euclidean(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
