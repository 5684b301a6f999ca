//! CLI configuration management

use anyhow::{Context as _, Result};
use config::{Config as ConfigLoader, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use worker_lab_workflow::RunnerConfig;

/// Environment variable prefix, e.g. `WORKER_LAB_RUNNER__PRIME_PROGRESS_INTERVAL`
pub const ENV_PREFIX: &str = "WORKER_LAB";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output
    Pretty,
    /// Single-line output
    #[default]
    Compact,
    /// Machine-readable JSON lines
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log: LogSettings,
    pub runner: RunnerConfig,
}

impl AppConfig {
    /// Load configuration from defaults, `config/default`, `config/local`,
    /// an optional explicit file and finally the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: AppConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Failed to parse configuration")?;

        config.runner.validate()?;
        Ok(config)
    }
}
