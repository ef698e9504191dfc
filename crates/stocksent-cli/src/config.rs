//! Application configuration

use crate::cli::Cli;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use stocksent_classifiers::{ModelConfig, ModelSource, TokenizerSource};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Sentiment model settings
    #[serde(default)]
    pub model: ModelConfig,
}

impl AppConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &Path, cli: &Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: Self = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?;
            tracing::debug!("Loaded configuration from {}", config_path.display());
            config
        } else {
            tracing::debug!(
                "No configuration file at {}, using defaults",
                config_path.display()
            );
            Self::default()
        };

        // Apply CLI overrides
        if let Some(model_dir) = &cli.model_dir {
            config.model.source = ModelSource::Local {
                path: model_dir.clone(),
            };
        }

        if let Some(tokenizer) = &cli.tokenizer {
            config.model.tokenizer = TokenizerSource::from_arg(tokenizer);
        }

        if let Some(device) = &cli.device {
            config.model.inference.device = device.clone();
        }

        Ok(config)
    }
}
