//! Cluster merging.
//!
//! Clusters seeded independently (one per candidate keyword, as in the
//! keyword-driven topic-discovery variant) can land on nearly the same
//! member set. A single pass over unordered pairs in discovery order
//! unions any pair whose member-set Jaccard similarity exceeds the
//! threshold; fixed-point iteration is deliberately not attempted.
//! Surviving clusters are then named from their highest-weight keywords.

use std::collections::HashSet;

use tracing::debug;

use recall_topics::naming::name_topic;
use recall_types::{Cluster, ClusterCollection, RecordId};

use crate::config::MergeConfig;

/// Merge near-duplicate clusters and assign topic names.
///
/// Idempotent on its own output: merged clusters are pairwise below the
/// threshold, so a second pass with the same configuration changes
/// nothing.
pub fn merge_overlapping(collection: ClusterCollection, config: &MergeConfig) -> ClusterCollection {
    let ClusterCollection {
        mut clusters,
        record_ids,
    } = collection;

    let count = clusters.len();
    let mut absorbed = vec![false; count];

    for i in 0..count {
        if absorbed[i] {
            continue;
        }
        for j in (i + 1)..count {
            if absorbed[j] {
                continue;
            }
            let similarity = jaccard(&clusters[i].member_ids, &clusters[j].member_ids);
            if similarity > config.threshold {
                debug!(
                    target_id = %clusters[i].cluster_id,
                    absorbed_id = %clusters[j].cluster_id,
                    similarity,
                    "Merging overlapping clusters"
                );
                let (head, tail) = clusters.split_at_mut(j);
                absorb(&mut head[i], &tail[0]);
                absorbed[j] = true;
            }
        }
    }

    let survivors: Vec<Cluster> = clusters
        .into_iter()
        .zip(absorbed)
        .filter(|(_, gone)| !gone)
        .map(|(cluster, _)| cluster)
        .collect();

    let named = survivors
        .into_iter()
        .enumerate()
        .map(|(ordinal, mut cluster)| {
            cluster.topic_name = name_topic(&cluster.keywords, ordinal);
            cluster
        })
        .collect();

    ClusterCollection::new(named, record_ids)
}

/// Jaccard similarity of two member-id sets.
pub fn jaccard(a: &[RecordId], b: &[RecordId]) -> f32 {
    let set_a: HashSet<&RecordId> = a.iter().collect();
    let set_b: HashSet<&RecordId> = b.iter().collect();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    intersection as f32 / union as f32
}

/// Union `source` into `target`: members, keywords, relevance, and a
/// member-count-weighted centroid.
fn absorb(target: &mut Cluster, source: &Cluster) {
    let target_n = target.member_ids.len() as f32;
    let source_n = source.member_ids.len() as f32;

    let have: HashSet<RecordId> = target.member_ids.iter().cloned().collect();
    for id in &source.member_ids {
        if !have.contains(id) {
            target.member_ids.push(id.clone());
        }
    }

    for keyword in &source.keywords {
        if !target.keywords.contains(keyword) {
            target.keywords.push(keyword.clone());
        }
    }

    target.relevance += source.relevance;

    target.centroid = match (target.centroid.take(), source.centroid.as_ref()) {
        (Some(a), Some(b)) if a.len() == b.len() => {
            let total = target_n + source_n;
            Some(
                a.iter()
                    .zip(b.iter())
                    .map(|(x, y)| (x * target_n + y * source_n) / total)
                    .collect(),
            )
        }
        (Some(a), _) => Some(a),
        (None, b) => b.cloned(),
    };
}
