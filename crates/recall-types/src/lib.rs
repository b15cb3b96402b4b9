//! # recall-types
//!
//! Shared domain types for the recall memory system.
//!
//! This crate defines the core data structures used throughout the system:
//! - Records: memory records and their embedding vectors
//! - Clusters: topic clusters produced by one clustering invocation
//! - Errors: the unified clustering error taxonomy
//!
//! ## Usage
//!
//! ```rust
//! use recall_types::{MemoryRecord, VectorRecord};
//! ```

pub mod cluster;
pub mod error;
pub mod record;

pub use cluster::{Cluster, ClusterCollection, ClusterOutcome, FallbackKind};
pub use error::ClusterError;
pub use record::{MemoryRecord, RecordId, VectorRecord};
