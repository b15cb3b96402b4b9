//! CLI argument parsing for the recall batch driver.

use clap::{Parser, Subcommand};

/// Recall batch driver
///
/// Clusters memory vectors from a JSON file and ranks stored memories
/// against a query vector, without going through a running service.
#[derive(Parser, Debug)]
#[command(name = "recall")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides the platform default location)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Driver commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cluster a JSON file of records into topic clusters
    Cluster {
        /// Input file: a JSON array of {id, vector} objects, or full
        /// memory records with --memories
        #[arg(short, long)]
        input: String,

        /// Output file for the cluster JSON; stdout when omitted
        #[arg(short, long)]
        output: Option<String>,

        /// Requested cluster count, reconciled with the automatic choice
        #[arg(long)]
        clusters: Option<usize>,

        /// Use raw Euclidean distance instead of cosine
        #[arg(long)]
        euclidean: bool,

        /// Treat the input as full memory records (enables the temporal
        /// fallback and keyword-based topic names)
        #[arg(long)]
        memories: bool,
    },

    /// Rank memory records against a query vector
    Rank {
        /// JSON array of memory records
        #[arg(short, long)]
        records: String,

        /// JSON array of floats holding the query vector
        #[arg(short = 'q', long)]
        query_vector: String,

        /// Query text for the lexical fallback
        #[arg(long, default_value = "")]
        query_text: String,

        /// Maximum results to return
        #[arg(short = 'n', long, default_value = "5")]
        limit: usize,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Report topic coverage of memory records against a topic map
    Coverage {
        /// JSON array of memory records
        #[arg(short, long)]
        records: String,

        /// JSON array of [topic, [keyword, ...]] pairs
        #[arg(short, long)]
        topics: String,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
}
