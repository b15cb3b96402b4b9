//! Cluster-count selection.
//!
//! Chooses a target k with no ground truth to validate against. Three
//! tiers keep the cost bounded: tiny inputs get a direct formula, huge
//! inputs get a forced floor so large corpora are never under-clustered,
//! and the mid tier earns its k through a silhouette-scored sweep of
//! trial partitionings. This stage never fails; every path ends in a
//! usable integer.

use ndarray::Array2;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::matrix::{evenly_spaced_sample, reduce_dimensions};
use crate::partition::run_kmeans;
use crate::silhouette::score_partition;

/// Select the cluster count for `data`, honoring an optional caller
/// request.
///
/// When both an automatic selection and an explicit request are present
/// they are reconciled by harmonic mean, which biases toward the smaller
/// value and avoids runaway cluster counts. The result is always within
/// `[2, max(2, N-1)]`.
pub fn select_k(data: &Array2<f64>, config: &EngineConfig, requested: Option<usize>) -> usize {
    let n = data.nrows();
    let auto = auto_k(data, config);

    let k = match requested {
        Some(req) if req >= 2 => {
            let blended = reconcile_requested_k(req, auto);
            info!(
                requested = req,
                auto, blended, "Reconciled requested and automatic cluster counts"
            );
            blended
        }
        Some(req) => {
            warn!(requested = req, "Ignoring requested cluster count below 2");
            auto
        }
        None => auto,
    };

    k.clamp(2, n.saturating_sub(1).max(2))
}

/// Harmonic mean of a requested and an automatically selected k.
///
/// A replaceable policy, not a derived optimum: it balances the caller's
/// expectation against the algorithm's suggestion while leaning small.
pub fn reconcile_requested_k(requested: usize, auto: usize) -> usize {
    let harmonic = 2.0 * requested as f64 * auto as f64 / (requested + auto) as f64;
    (harmonic.round() as usize).max(2)
}

/// Tiered automatic selection.
fn auto_k(data: &Array2<f64>, config: &EngineConfig) -> usize {
    let n = data.nrows();
    let selection = &config.selection;

    if n < selection.tiny_threshold {
        let k = (n / 2).clamp(2, 5);
        debug!(n, k, "Tiny tier cluster count");
        return k;
    }

    if n >= selection.huge_threshold {
        let k = (n / selection.records_per_cluster)
            .clamp(selection.huge_min_clusters, selection.huge_max_clusters);
        info!(n, k, "Huge tier forces cluster-count floor");
        return k;
    }

    mid_tier_k(data, config)
}

/// Mid tier: silhouette-scored sweep over a bounded candidate range with
/// a dynamic step, evaluated on the (possibly reduced and subsampled)
/// matrix.
fn mid_tier_k(data: &Array2<f64>, config: &EngineConfig) -> usize {
    let n = data.nrows();
    let selection = &config.selection;

    let reduced = reduce_dimensions(data, &config.preprocess);
    let sample = evenly_spaced_sample(&reduced, config.preprocess.sample_ceiling);
    let sample_n = sample.nrows();

    let sweep_max = selection.sweep_max.min(n / 5);
    if sweep_max < selection.sweep_min {
        return empirical_k(n);
    }
    let step = ((sweep_max - selection.sweep_min) / 10).max(1);

    let mut rng = Xoshiro256Plus::seed_from_u64(config.seed);
    let mut best: Option<(usize, f64)> = None;

    let mut k = selection.sweep_min;
    while k <= sweep_max {
        if k >= sample_n {
            break;
        }
        match run_kmeans(&sample, k, &config.partition, config.seed) {
            Ok((labels, _)) => {
                if let Some(score) = score_partition(&sample, &labels, selection, &mut rng) {
                    debug!(k, score, "Trial partitioning scored");
                    if best.map_or(true, |(_, s)| score > s) {
                        best = Some((k, score));
                    }
                }
            }
            Err(err) => {
                warn!(k, error = %err, "Trial partitioning failed");
            }
        }
        k += step;
    }

    match best {
        Some((k, score)) => {
            info!(k, score, "Silhouette sweep selected cluster count");
            k
        }
        None => {
            let k = empirical_k(n);
            warn!(
                n,
                k, "Silhouette sweep produced no valid labeling, using empirical formula"
            );
            k
        }
    }
}

/// Empirical fallback formula: `clamp(round(sqrt(N/2)), 5, 30)`.
fn empirical_k(n: usize) -> usize {
    ((n as f64 / 2.0).sqrt().round() as usize).clamp(5, 30)
}
