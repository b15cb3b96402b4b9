//! End-to-end properties of the clustering pipeline on synthetic data.

use std::collections::HashSet;

use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rand_xoshiro::Xoshiro256Plus;

use recall_clustering::{select_k, ClusterRequest, ClusteringEngine, EngineConfig};
use recall_types::{FallbackKind, VectorRecord};

/// `blob_count` Gaussian blobs of `per_blob` points in `dim` dimensions,
/// centers spread far apart relative to the blob spread.
fn gaussian_blobs(
    blob_count: usize,
    per_blob: usize,
    dim: usize,
    seed: u64,
) -> Vec<VectorRecord> {
    let mut rng = Xoshiro256Plus::seed_from_u64(seed);
    let spread = Normal::new(0.0f64, 0.5).unwrap();

    let centers: Vec<Vec<f64>> = (0..blob_count)
        .map(|_| (0..dim).map(|_| rng.gen_range(-1.0..1.0) * 30.0).collect())
        .collect();

    let mut records = Vec::new();
    for (b, center) in centers.iter().enumerate() {
        for p in 0..per_blob {
            let vector: Vec<f32> = center
                .iter()
                .map(|&c| (c + spread.sample(&mut rng)) as f32)
                .collect();
            records.push(VectorRecord::new(format!("blob{b}-{p}"), vector));
        }
    }
    records
}

fn to_matrix(records: &[VectorRecord]) -> Array2<f64> {
    let dim = records[0].vector.len();
    Array2::from_shape_fn((records.len(), dim), |(i, j)| {
        f64::from(records[i].vector[j])
    })
}

#[test]
fn selected_k_tracks_blob_count_in_mid_tier() {
    let config = EngineConfig::default();
    for (blob_count, per_blob) in [(3usize, 40usize), (6, 40), (10, 35)] {
        let records = gaussian_blobs(blob_count, per_blob, 8, 99 + blob_count as u64);
        let data = to_matrix(&records);
        let k = select_k(&data, &config, None);
        let diff = k.abs_diff(blob_count);
        assert!(
            diff <= 2,
            "{blob_count} blobs: selected k={k}, off by {diff}"
        );
    }
}

#[test]
fn huge_tier_partitions_all_450_ids() {
    let mut rng = Xoshiro256Plus::seed_from_u64(5);
    let records: Vec<VectorRecord> = (0..450)
        .map(|i| {
            let vector: Vec<f32> = (0..50).map(|_| rng.gen_range(-1.0f32..1.0)).collect();
            VectorRecord::new(format!("m{i}"), vector)
        })
        .collect();

    let config = EngineConfig::default();
    let data = to_matrix(&records);
    let k = select_k(&data, &config, None);
    assert!((30..=40).contains(&k), "huge tier k out of range: {k}");

    let engine = ClusteringEngine::new(config);
    let outcome = engine
        .cluster_vectors(&records, &ClusterRequest::default())
        .unwrap();

    assert!(outcome.clusters.len() <= k);
    let mut seen = HashSet::new();
    for cluster in &outcome.clusters {
        assert!(!cluster.is_empty());
        for id in &cluster.member_ids {
            assert!(seen.insert(id.clone()), "id {id} appears twice");
        }
    }
    assert_eq!(seen.len(), 450);
}

#[test]
fn identical_input_identical_assignments() {
    let records = gaussian_blobs(4, 30, 16, 11);
    let engine = ClusteringEngine::default();

    let first = engine
        .cluster_vectors(&records, &ClusterRequest::default())
        .unwrap();
    let second = engine
        .cluster_vectors(&records, &ClusterRequest::default())
        .unwrap();

    let memberships = |o: &recall_types::ClusterOutcome| -> Vec<Vec<String>> {
        o.clusters.iter().map(|c| c.member_ids.clone()).collect()
    };
    assert_eq!(memberships(&first), memberships(&second));
    assert_eq!(first.fallback_used, FallbackKind::Vector);
}

#[test]
fn blob_members_stay_together() {
    let records = gaussian_blobs(3, 25, 8, 21);
    let engine = ClusteringEngine::default();
    let outcome = engine
        .cluster_vectors(&records, &ClusterRequest::default())
        .unwrap();

    // With well-separated blobs no cluster should straddle two blobs.
    for cluster in &outcome.clusters {
        let prefixes: HashSet<&str> = cluster
            .member_ids
            .iter()
            .map(|id| id.split('-').next().unwrap())
            .collect();
        assert_eq!(
            prefixes.len(),
            1,
            "cluster mixes blobs: {:?}",
            cluster.member_ids
        );
    }
}

#[test]
fn requested_k_pulls_result_down() {
    let records = gaussian_blobs(6, 40, 8, 31);
    let data = to_matrix(&records);
    let config = EngineConfig::default();

    let auto = select_k(&data, &config, None);
    let blended = select_k(&data, &config, Some(2));
    assert!(blended < auto, "harmonic blend {blended} not below {auto}");
    assert!(blended >= 2);
}
