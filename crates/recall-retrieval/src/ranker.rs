//! Similarity ranking.
//!
//! The primary score is cosine similarity between the query vector and a
//! record's embedding. Records without an embedding, or with one of a
//! different dimension (a corpus that outlived an embedding-model change),
//! are scored by Jaccard overlap of lowercase word sets instead of being
//! dropped. Sorting is stable and descending, so ties keep original order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use recall_topics::cosine_similarity;
use recall_types::MemoryRecord;

/// How a record's score was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreKind {
    /// Cosine similarity of query and record embeddings
    Cosine,
    /// Jaccard overlap of lowercase word sets
    Lexical,
}

/// A record with its relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedMemory {
    /// The scored record
    pub record: MemoryRecord,
    /// Relevance to the query
    pub score: f32,
    /// Which scoring path produced the score
    pub score_kind: ScoreKind,
}

/// Ranks memory records against a query.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityRanker;

impl SimilarityRanker {
    /// Create a ranker.
    pub fn new() -> Self {
        Self
    }

    /// Rank `records` against the query, best first, truncated to `limit`.
    ///
    /// `query_text` feeds the lexical fallback; records whose embedding
    /// matches the query dimension are scored by cosine similarity.
    pub fn rank(
        &self,
        records: &[MemoryRecord],
        query_vector: &[f32],
        query_text: &str,
        limit: usize,
    ) -> Vec<RankedMemory> {
        let query_words = word_set(query_text);

        let mut ranked: Vec<RankedMemory> = records
            .iter()
            .map(|record| self.score_record(record, query_vector, &query_words))
            .collect();

        // Stable sort keeps original order on ties
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(limit);
        ranked
    }

    /// Score one record, never failing: incompatible or missing vectors
    /// degrade to the lexical path.
    fn score_record(
        &self,
        record: &MemoryRecord,
        query_vector: &[f32],
        query_words: &HashSet<String>,
    ) -> RankedMemory {
        match record.embedding.as_ref() {
            Some(embedding)
                if !embedding.is_empty() && embedding.len() == query_vector.len() =>
            {
                RankedMemory {
                    record: record.clone(),
                    score: cosine_similarity(query_vector, embedding),
                    score_kind: ScoreKind::Cosine,
                }
            }
            other => {
                if let Some(embedding) = other {
                    debug!(
                        record_id = %record.id,
                        record_dim = embedding.len(),
                        query_dim = query_vector.len(),
                        "Embedding incompatible with query, using lexical overlap"
                    );
                }
                RankedMemory {
                    record: record.clone(),
                    score: lexical_overlap(query_words, &word_set(&record.content)),
                    score_kind: ScoreKind::Lexical,
                }
            }
        }
    }
}

/// Jaccard similarity of two word sets; 0.0 when either is empty.
fn lexical_overlap(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f32 / union.max(1) as f32
}

/// Lowercase whitespace-tokenized word set.
fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: &str, content: &str, embedding: Option<Vec<f32>>) -> MemoryRecord {
        let mut rec = MemoryRecord::new(id, content, Utc::now());
        rec.embedding = embedding;
        rec
    }

    #[test]
    fn test_ranks_by_cosine_when_dimensions_match() {
        let records = vec![
            record("far", "unrelated", Some(vec![0.0, 1.0])),
            record("near", "unrelated", Some(vec![1.0, 0.05])),
        ];
        let ranked = SimilarityRanker::new().rank(&records, &[1.0, 0.0], "query", 10);
        assert_eq!(ranked[0].record.id, "near");
        assert_eq!(ranked[0].score_kind, ScoreKind::Cosine);
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn test_mixed_dimensions_do_not_raise() {
        // One 10-dim record, one 20-dim record, 10-dim query: the first is
        // scored by real cosine, the second by lexical overlap.
        let records = vec![
            record("ten", "alpha beta", Some(vec![1.0; 10])),
            record("twenty", "some query words here", Some(vec![1.0; 20])),
        ];
        let query: Vec<f32> = vec![1.0; 10];
        let ranked = SimilarityRanker::new().rank(&records, &query, "some query words", 10);

        let ten = ranked.iter().find(|r| r.record.id == "ten").unwrap();
        let twenty = ranked.iter().find(|r| r.record.id == "twenty").unwrap();
        assert_eq!(ten.score_kind, ScoreKind::Cosine);
        assert!((ten.score - 1.0).abs() < 1e-6);
        assert_eq!(twenty.score_kind, ScoreKind::Lexical);
        assert!(twenty.score > 0.0);
    }

    #[test]
    fn test_missing_embedding_scored_lexically() {
        let records = vec![
            record("hit", "rust borrow checker", None),
            record("miss", "completely different themes", None),
        ];
        let ranked = SimilarityRanker::new().rank(&records, &[1.0, 0.0], "rust borrow checker", 10);
        assert_eq!(ranked[0].record.id, "hit");
        assert_eq!(ranked[0].score_kind, ScoreKind::Lexical);
        assert!((ranked[0].score - 1.0).abs() < 1e-6);
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn test_zero_norm_vector_scores_zero() {
        let records = vec![record("zero", "text", Some(vec![0.0, 0.0]))];
        let ranked = SimilarityRanker::new().rank(&records, &[1.0, 0.0], "", 10);
        assert_eq!(ranked[0].score, 0.0);
        assert_eq!(ranked[0].score_kind, ScoreKind::Cosine);
    }

    #[test]
    fn test_empty_query_text_gives_zero_lexical() {
        let records = vec![record("a", "content here", None)];
        let ranked = SimilarityRanker::new().rank(&records, &[1.0], "", 10);
        assert_eq!(ranked[0].score, 0.0);
    }

    #[test]
    fn test_limit_truncates() {
        let records: Vec<MemoryRecord> = (0..20)
            .map(|i| record(&format!("m{i}"), "text", Some(vec![1.0, i as f32])))
            .collect();
        let ranked = SimilarityRanker::new().rank(&records, &[1.0, 0.0], "", 5);
        assert_eq!(ranked.len(), 5);
    }

    #[test]
    fn test_ties_keep_original_order() {
        let records = vec![
            record("first", "same words", None),
            record("second", "same words", None),
        ];
        let ranked = SimilarityRanker::new().rank(&records, &[1.0], "same words", 10);
        assert_eq!(ranked[0].record.id, "first");
        assert_eq!(ranked[1].record.id, "second");
    }

    #[test]
    fn test_negated_vector_ranks_last() {
        let records = vec![
            record("opposite", "", Some(vec![-1.0, 0.0])),
            record("aligned", "", Some(vec![1.0, 0.0])),
            record("orthogonal", "", Some(vec![0.0, 1.0])),
        ];
        let ranked = SimilarityRanker::new().rank(&records, &[1.0, 0.0], "", 10);
        assert_eq!(ranked[0].record.id, "aligned");
        assert_eq!(ranked[2].record.id, "opposite");
        assert!((ranked[2].score + 1.0).abs() < 1e-6);
    }
}
