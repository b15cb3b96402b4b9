//! # recall-topics
//!
//! Text-side capabilities for the recall memory system.
//!
//! This crate turns raw cluster membership into navigable topics:
//! keyword extraction over member content, topic naming from the most
//! representative keywords, coverage analysis against a caller-supplied
//! topic map, and semantic links between cluster centroids for the
//! knowledge graph.
//!
//! ## Features
//! - TF-IDF keyword extraction with stop-word filtering
//! - Topic naming from the one or two highest-weight keywords
//! - Topic coverage percentages and study suggestions
//! - Semantic topic-graph links between cluster centroids

pub mod coverage;
pub mod graph;
pub mod keywords;
pub mod naming;
pub mod similarity;

pub use coverage::{analyze_coverage, CoverageReport, TopicCoverage, TopicMap};
pub use graph::{build_semantic_links, SemanticLink};
pub use keywords::{KeywordConfig, KeywordExtractor};
pub use naming::{name_topic, placeholder_name};
pub use similarity::cosine_similarity;
