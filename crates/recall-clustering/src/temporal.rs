//! Temporal fallback clustering.
//!
//! When too few records carry usable embeddings there is no geometry to
//! partition, but the timeline still structures the corpus: records are
//! sorted by timestamp and split into a bounded number of contiguous
//! buckets. Guarantees a non-empty result for any non-empty input.

use tracing::info;

use recall_topics::naming::name_topic;
use recall_topics::KeywordExtractor;
use recall_types::{Cluster, ClusterCollection, ClusterError, MemoryRecord};

use crate::config::TemporalConfig;

/// Bucket records by timestamp into at most `max_buckets` clusters.
///
/// Clusters carry no centroid; keywords and topic names come from lexical
/// extraction over each bucket's content.
pub fn cluster_by_time(
    records: &[MemoryRecord],
    config: &TemporalConfig,
    extractor: &KeywordExtractor,
) -> Result<ClusterCollection, ClusterError> {
    if records.is_empty() {
        return Err(ClusterError::InsufficientData(
            "no records to bucket by time".to_string(),
        ));
    }

    let mut ordered: Vec<&MemoryRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.timestamp);

    let n = ordered.len();
    let bucket_count = (n / config.records_per_bucket)
        .max(2)
        .min(config.max_buckets);
    let bucket_size = (n + bucket_count - 1) / bucket_count;

    info!(
        n,
        bucket_count, "Falling back to temporal clustering, no usable embeddings"
    );

    let mut clusters = Vec::new();
    for (ordinal, bucket) in ordered.chunks(bucket_size).enumerate() {
        let contents: Vec<&str> = bucket.iter().map(|r| r.content.as_str()).collect();
        let mut keywords = extractor.extract(&contents);
        if keywords.is_empty() {
            // Lexical extraction found nothing; reuse any pre-extracted
            // record keywords before settling for a placeholder name.
            for record in bucket {
                for keyword in &record.keywords {
                    if !keywords.contains(keyword) {
                        keywords.push(keyword.clone());
                    }
                }
            }
        }

        let mut cluster = Cluster::new(bucket.iter().map(|r| r.id.clone()).collect());
        cluster.relevance = bucket.len() as f32 / n as f32;
        cluster.topic_name = name_topic(&keywords, ordinal);
        cluster.keywords = keywords;
        clusters.push(cluster);
    }

    let universe = ordered.iter().map(|r| r.id.clone()).collect();
    Ok(ClusterCollection::new(clusters, universe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use std::collections::HashSet;

    fn records_spanning_hours(n: usize) -> Vec<MemoryRecord> {
        let start = Utc::now() - Duration::hours(n as i64);
        (0..n)
            .map(|i| {
                MemoryRecord::new(
                    format!("m{i}"),
                    format!("note number {i} about database indexing"),
                    start + Duration::hours(i as i64),
                )
            })
            .collect()
    }

    #[test]
    fn test_five_records_two_to_five_buckets() {
        let records = records_spanning_hours(5);
        let collection = cluster_by_time(
            &records,
            &TemporalConfig::default(),
            &KeywordExtractor::default(),
        )
        .unwrap();

        assert!(collection.clusters.len() >= 2 && collection.clusters.len() <= 5);
        let all: HashSet<String> = collection
            .clusters
            .iter()
            .flat_map(|c| c.member_ids.iter().cloned())
            .collect();
        assert_eq!(all.len(), 5);
        assert!(collection.clusters.iter().all(|c| !c.is_empty()));
        assert!(collection.clusters.iter().all(|c| c.centroid.is_none()));
    }

    #[test]
    fn test_single_record_single_bucket() {
        let records = records_spanning_hours(1);
        let collection = cluster_by_time(
            &records,
            &TemporalConfig::default(),
            &KeywordExtractor::default(),
        )
        .unwrap();
        assert_eq!(collection.clusters.len(), 1);
        assert_eq!(collection.clusters[0].member_ids, vec!["m0"]);
    }

    #[test]
    fn test_bucket_count_bounded_by_ten() {
        let records = records_spanning_hours(500);
        let collection = cluster_by_time(
            &records,
            &TemporalConfig::default(),
            &KeywordExtractor::default(),
        )
        .unwrap();
        assert_eq!(collection.clusters.len(), 10);
    }

    #[test]
    fn test_buckets_are_contiguous_in_time() {
        let records = records_spanning_hours(40);
        let collection = cluster_by_time(
            &records,
            &TemporalConfig::default(),
            &KeywordExtractor::default(),
        )
        .unwrap();

        // Records were generated in id order == time order; each bucket
        // must hold a contiguous id range strictly after the previous one.
        let mut last_max = -1i64;
        for cluster in &collection.clusters {
            let indices: Vec<i64> = cluster
                .member_ids
                .iter()
                .map(|id| id.trim_start_matches('m').parse().unwrap())
                .collect();
            let min = *indices.iter().min().unwrap();
            let max = *indices.iter().max().unwrap();
            assert!(min > last_max);
            assert_eq!((max - min + 1) as usize, indices.len());
            last_max = max;
        }
    }

    #[test]
    fn test_empty_input_rejected() {
        let result = cluster_by_time(
            &[],
            &TemporalConfig::default(),
            &KeywordExtractor::default(),
        );
        assert!(matches!(result, Err(ClusterError::InsufficientData(_))));
    }

    #[test]
    fn test_buckets_named_from_content() {
        let records = records_spanning_hours(20);
        let collection = cluster_by_time(
            &records,
            &TemporalConfig::default(),
            &KeywordExtractor::default(),
        )
        .unwrap();
        for cluster in &collection.clusters {
            assert!(!cluster.topic_name.is_empty());
            assert!(!cluster.keywords.is_empty());
        }
    }
}
