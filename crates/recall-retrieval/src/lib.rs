//! # recall-retrieval
//!
//! Similarity ranking over stored memory records.
//!
//! Orders records by relevance to a query vector using cosine similarity,
//! degrading per record to lexical word-set overlap when an embedding is
//! absent or dimensionally incompatible. A single corrupt record can
//! lower its own score but never abort a retrieval.

pub mod ranker;

pub use ranker::{RankedMemory, ScoreKind, SimilarityRanker};
