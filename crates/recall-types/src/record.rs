//! Memory record types.
//!
//! A `MemoryRecord` is one short text memory owned by the external memory
//! store. The clustering engine only reads its embedding, content/keywords
//! and timestamp; it never mutates records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unique identifier for a memory record.
pub type RecordId = String;

/// An identified embedding vector, the unit of input to the vector
/// clustering path.
///
/// All vectors within one clustering call must share the same dimension;
/// a mismatch is reported as `ClusterError::DimensionMismatch`, never a
/// panic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Identifier of the memory this vector belongs to
    pub id: RecordId,
    /// Embedding components
    pub vector: Vec<f32>,
}

impl VectorRecord {
    /// Create a new vector record.
    pub fn new(id: impl Into<RecordId>, vector: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            vector,
        }
    }

    /// Dimension of the embedding.
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}

/// A stored memory record.
///
/// The embedding is optional: records written while the embedding provider
/// was unavailable carry none and are served by the temporal/lexical
/// fallback paths instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Unique record identifier
    pub id: RecordId,

    /// Memory text content
    pub content: String,

    /// Embedding vector, absent when the provider failed or has not run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,

    /// When the memory was recorded
    pub timestamp: DateTime<Utc>,

    /// Pre-extracted keywords, may be empty
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Optional short summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl MemoryRecord {
    /// Create a new record with content and timestamp only.
    pub fn new(id: impl Into<RecordId>, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            embedding: None,
            timestamp,
            keywords: Vec::new(),
            summary: None,
        }
    }

    /// Attach an embedding vector.
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Whether the record carries a usable (non-empty) embedding.
    pub fn has_embedding(&self) -> bool {
        self.embedding.as_ref().is_some_and(|e| !e.is_empty())
    }

    /// Borrow the embedding as a `VectorRecord`, if usable.
    pub fn vector_record(&self) -> Option<VectorRecord> {
        self.embedding
            .as_ref()
            .filter(|e| !e.is_empty())
            .map(|e| VectorRecord::new(self.id.clone(), e.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_record_dimension() {
        let rec = VectorRecord::new("m1", vec![0.1, 0.2, 0.3]);
        assert_eq!(rec.dimension(), 3);
        assert_eq!(rec.id, "m1");
    }

    #[test]
    fn test_memory_record_without_embedding() {
        let rec = MemoryRecord::new("m1", "some content", Utc::now());
        assert!(!rec.has_embedding());
        assert!(rec.vector_record().is_none());
    }

    #[test]
    fn test_memory_record_with_embedding() {
        let rec = MemoryRecord::new("m1", "some content", Utc::now()).with_embedding(vec![1.0, 2.0]);
        assert!(rec.has_embedding());
        let vec_rec = rec.vector_record().unwrap();
        assert_eq!(vec_rec.id, "m1");
        assert_eq!(vec_rec.dimension(), 2);
    }

    #[test]
    fn test_empty_embedding_not_usable() {
        let rec = MemoryRecord::new("m1", "content", Utc::now()).with_embedding(vec![]);
        assert!(!rec.has_embedding());
        assert!(rec.vector_record().is_none());
    }

    #[test]
    fn test_memory_record_serde_defaults() {
        let json = r#"{"id":"m1","content":"hello","timestamp":"2024-03-01T10:00:00Z"}"#;
        let rec: MemoryRecord = serde_json::from_str(json).unwrap();
        assert!(rec.embedding.is_none());
        assert!(rec.keywords.is_empty());
        assert!(rec.summary.is_none());
    }
}
