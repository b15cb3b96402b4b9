//! # recall-cli
//!
//! Batch command-line driver for recall: cluster a JSON file of records,
//! rank stored memories against a query vector, and report topic
//! coverage, all without a running service.

pub mod cli;
pub mod commands;
pub mod settings;

pub use cli::{Cli, Commands};
pub use commands::{handle_cluster, handle_coverage, handle_rank, init_logging};
pub use settings::Settings;
