//! Model configuration structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use stocksent_core::{Error, Result, Sentiment};

/// Directory the fine-tuned checkpoint is read from unless configured otherwise
pub const DEFAULT_MODEL_DIR: &str = "./models/bertweet_stock_tweet/";

/// Hub repository providing the BERTweet tokenizer
pub const DEFAULT_TOKENIZER_REPO: &str = "vinai/bertweet-base";

/// Configuration for the sentiment model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name
    #[serde(default = "default_name")]
    pub name: String,

    /// Where the weights and config.json live
    #[serde(default)]
    pub source: ModelSource,

    /// Where the tokenizer comes from
    #[serde(default)]
    pub tokenizer: TokenizerSource,

    /// Model architecture
    #[serde(default)]
    pub architecture: ArchitectureConfig,

    /// Labels in output-index order
    #[serde(default = "default_labels")]
    pub labels: Vec<Sentiment>,

    /// Inference settings
    #[serde(default)]
    pub inference: InferenceConfig,
}

fn default_name() -> String {
    "bertweet-stock-tweet".to_string()
}

fn default_labels() -> Vec<Sentiment> {
    Sentiment::ALL.to_vec()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            source: ModelSource::default(),
            tokenizer: TokenizerSource::default(),
            architecture: ArchitectureConfig::default(),
            labels: default_labels(),
            inference: InferenceConfig::default(),
        }
    }
}

impl ModelConfig {
    /// Create a configuration for a local model directory
    pub fn from_local(path: impl Into<PathBuf>) -> Self {
        Self {
            source: ModelSource::Local { path: path.into() },
            ..Default::default()
        }
    }

    /// Check settings that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.labels.is_empty() {
            return Err(Error::config("Model label list must not be empty"));
        }

        for (idx, label) in self.labels.iter().enumerate() {
            if self.labels[..idx].contains(label) {
                return Err(Error::config(format!("Duplicate model label {}", label)));
            }
        }

        if self.inference.max_length == 0 {
            return Err(Error::config("inference.max_length must be greater than zero"));
        }

        Ok(())
    }
}

/// Model source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModelSource {
    /// Load from local filesystem
    Local { path: PathBuf },
}

impl Default for ModelSource {
    fn default() -> Self {
        Self::Local {
            path: PathBuf::from(DEFAULT_MODEL_DIR),
        }
    }
}

/// Tokenizer source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TokenizerSource {
    /// `tokenizer.json` next to the model weights
    ModelDir,

    /// A `tokenizer.json` file, or a directory containing one
    Local { path: PathBuf },

    /// Fetch `tokenizer.json` from the HuggingFace Hub
    #[serde(rename = "huggingface")]
    HuggingFace {
        repo: String,
        #[serde(default = "default_revision")]
        revision: String,
    },
}

fn default_revision() -> String {
    "main".to_string()
}

impl Default for TokenizerSource {
    fn default() -> Self {
        Self::HuggingFace {
            repo: DEFAULT_TOKENIZER_REPO.to_string(),
            revision: default_revision(),
        }
    }
}

impl TokenizerSource {
    /// Interpret a command-line value: existing paths are local, anything else is a hub repo id
    pub fn from_arg(value: &str) -> Self {
        let path = PathBuf::from(value);
        if path.exists() {
            Self::Local { path }
        } else {
            Self::HuggingFace {
                repo: value.to_string(),
                revision: default_revision(),
            }
        }
    }
}

/// Model architecture configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchitectureConfig {
    /// RoBERTa-family encoder with a dense + out_proj head (BERTweet)
    #[default]
    RobertaSequenceClassification,

    /// BERT encoder with pooler and linear head
    BertSequenceClassification,
}

/// Inference configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Device to run on (cpu, cuda, cuda:N, metal)
    #[serde(default = "default_device")]
    pub device: String,

    /// Maximum sequence length in tokens, special tokens included
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_max_length() -> usize {
    128
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            max_length: default_max_length(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_config() {
        let yaml = r#"
name: "bertweet-stock-tweet"
source:
  type: local
  path: "./models/bertweet_stock_tweet/"
tokenizer:
  type: huggingface
  repo: "vinai/bertweet-base"
architecture: roberta-sequence-classification
labels: [NEGATIVE, NEUTRAL, POSITIVE]
inference:
  device: "cpu"
  max_length: 128
"#;

        let config: ModelConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "bertweet-stock-tweet");
        assert_eq!(config.labels, Sentiment::ALL.to_vec());
        assert_eq!(config.inference.max_length, 128);
        assert_eq!(
            config.tokenizer,
            TokenizerSource::HuggingFace {
                repo: "vinai/bertweet-base".to_string(),
                revision: "main".to_string(),
            }
        );
        config.validate().unwrap();
    }

    #[test]
    fn test_defaults_match_stock_tweet_checkpoint() {
        let config: ModelConfig = serde_yaml::from_str("{}").unwrap();

        assert_eq!(config.source, ModelSource::default());
        match &config.source {
            ModelSource::Local { path } => {
                assert_eq!(path.to_str().unwrap(), DEFAULT_MODEL_DIR);
            }
        }
        assert_eq!(
            config.architecture,
            ArchitectureConfig::RobertaSequenceClassification
        );
        assert_eq!(config.inference.device, "cpu");
    }

    #[test]
    fn test_bert_with_model_dir_tokenizer() {
        let yaml = r#"
source:
  type: local
  path: "/opt/models/finbert"
tokenizer:
  type: model-dir
architecture: bert-sequence-classification
labels: [POSITIVE, NEGATIVE, NEUTRAL]
"#;

        let config: ModelConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.tokenizer, TokenizerSource::ModelDir);
        assert_eq!(
            config.architecture,
            ArchitectureConfig::BertSequenceClassification
        );
        assert_eq!(config.labels[0], Sentiment::Positive);
    }

    #[test]
    fn test_unknown_label_rejected() {
        let yaml = "labels: [BULLISH, BEARISH]";
        assert!(serde_yaml::from_str::<ModelConfig>(yaml).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_labels() {
        let mut config = ModelConfig::default();
        config.labels.clear();
        assert!(config.validate().is_err());

        config.labels = vec![Sentiment::Positive, Sentiment::Positive];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tokenizer_from_arg() {
        let dir = tempfile::tempdir().unwrap();
        let local = TokenizerSource::from_arg(dir.path().to_str().unwrap());
        assert!(matches!(local, TokenizerSource::Local { .. }));

        let hub = TokenizerSource::from_arg("vinai/bertweet-large");
        assert_eq!(
            hub,
            TokenizerSource::HuggingFace {
                repo: "vinai/bertweet-large".to_string(),
                revision: "main".to_string(),
            }
        );
    }
}
