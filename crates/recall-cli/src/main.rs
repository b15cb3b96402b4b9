//! Recall batch driver
//!
//! # Usage
//!
//! ```bash
//! recall cluster --input vectors.json --output clusters.json
//! recall cluster --input memories.json --memories --clusters 8
//! recall rank --records memories.json --query-vector query.json --limit 5
//! recall coverage --records memories.json --topics topics.json
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (`<config dir>/recall/config.toml`, or `--config`)
//! 3. Environment variables (`RECALL_*`)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use recall_cli::{
    handle_cluster, handle_coverage, handle_rank, init_logging, Cli, Commands, Settings,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(log_level) = cli.log_level.as_deref() {
        settings.log_level = log_level.to_string();
    }
    init_logging(&settings.log_level)?;

    match cli.command {
        Commands::Cluster {
            input,
            output,
            clusters,
            euclidean,
            memories,
        } => {
            handle_cluster(
                &settings,
                &input,
                output.as_deref(),
                clusters,
                euclidean,
                memories,
            )?;
        }
        Commands::Rank {
            records,
            query_vector,
            query_text,
            limit,
            output,
        } => {
            handle_rank(
                &records,
                &query_vector,
                &query_text,
                limit,
                output.as_deref(),
            )?;
        }
        Commands::Coverage {
            records,
            topics,
            output,
        } => {
            handle_coverage(&records, &topics, output.as_deref())?;
        }
    }

    Ok(())
}
