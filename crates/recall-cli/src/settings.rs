//! Layered settings for the batch driver.
//!
//! Precedence, lowest to highest: built-in defaults, platform config file
//! (`<config dir>/recall/config.toml`), a CLI-specified config file,
//! `RECALL_*` environment variables, CLI flags.

use std::path::PathBuf;

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use recall_clustering::EngineConfig;

/// Driver settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Clustering engine configuration
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            engine: EngineConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Load settings with the layered precedence above.
    pub fn load(cli_config_path: Option<&str>) -> anyhow::Result<Self> {
        let config_dir = ProjectDirs::from("", "", "recall")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("log_level", default_log_level())?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("RECALL")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }
}
