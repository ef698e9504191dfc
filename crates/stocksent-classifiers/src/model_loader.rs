//! Model loading for Candle-based sentiment classifiers
//!
//! Turns a [`ModelConfig`] into a ready-to-use [`Classifier`]. Loading is
//! fail-fast: any missing or corrupt artifact is reported as an error and
//! nothing is retried.

use crate::bertweet::{build_bertweet_tokenizer, CODES_FILE, VOCAB_FILE};
use crate::classifier::Classifier;
use crate::model_config::{ArchitectureConfig, ModelConfig, ModelSource, TokenizerSource};
use crate::sequence::{BertSequenceClassifier, RobertaSequenceClassifier};
use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use hf_hub::{api::sync::Api, Repo, RepoType};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use stocksent_core::{Error, Result};
use tokenizers::{Tokenizer, TruncationParams};

const CONFIG_FILE: &str = "config.json";
const WEIGHTS_FILE: &str = "model.safetensors";
const TOKENIZER_FILE: &str = "tokenizer.json";

/// Loads the configured checkpoint into a classifier
pub struct ModelLoader {
    config: ModelConfig,
}

impl ModelLoader {
    /// Create a new model loader
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    /// Load tokenizer and weights and build the classifier
    pub fn load(&self) -> Result<Box<dyn Classifier>> {
        self.config.validate()?;

        let model_path = self.resolve_model_path()?;
        tracing::info!(
            "Loading model '{}' from {}",
            self.config.name,
            model_path.display()
        );

        let tokenizer = self.load_tokenizer(&model_path)?;
        let device = get_device(&self.config.inference.device)?;
        warn_on_label_mismatch(&model_path, self.config.labels.len());

        let classifier: Box<dyn Classifier> = match self.config.architecture {
            ArchitectureConfig::RobertaSequenceClassification => {
                let roberta_config = parse_json_config(&model_path.join(CONFIG_FILE))?;
                let vb = load_var_builder(&model_path, &device)?;
                Box::new(RobertaSequenceClassifier::load(
                    &self.config,
                    &roberta_config,
                    vb,
                    tokenizer,
                    device,
                )?)
            }
            ArchitectureConfig::BertSequenceClassification => {
                let bert_config = parse_json_config(&model_path.join(CONFIG_FILE))?;
                let vb = load_var_builder(&model_path, &device)?;
                Box::new(BertSequenceClassifier::load(
                    &self.config,
                    &bert_config,
                    vb,
                    tokenizer,
                    device,
                )?)
            }
        };

        tracing::info!(
            "Successfully loaded {:?} classifier with labels {:?}",
            self.config.architecture,
            self.config.labels
        );

        Ok(classifier)
    }

    /// Resolve model directory from source
    fn resolve_model_path(&self) -> Result<PathBuf> {
        match &self.config.source {
            ModelSource::Local { path } => {
                if !path.is_dir() {
                    return Err(Error::config(format!(
                        "Model path does not exist: {}",
                        path.display()
                    )));
                }
                Ok(path.clone())
            }
        }
    }

    /// Resolve and configure the tokenizer
    fn load_tokenizer(&self, model_path: &Path) -> Result<Tokenizer> {
        let files = match &self.config.tokenizer {
            TokenizerSource::ModelDir => tokenizer_files_in(model_path)?,
            TokenizerSource::Local { path } if path.is_dir() => tokenizer_files_in(path)?,
            TokenizerSource::Local { path } => {
                if !path.exists() {
                    return Err(Error::classifier(format!(
                        "Tokenizer not found: {}",
                        path.display()
                    )));
                }
                TokenizerFiles::Json(path.clone())
            }
            TokenizerSource::HuggingFace { repo, revision } => fetch_tokenizer(repo, revision)?,
        };

        let mut tokenizer = match files {
            TokenizerFiles::Json(path) => {
                tracing::debug!("Loading tokenizer from {}", path.display());
                Tokenizer::from_file(&path)
                    .map_err(|e| Error::classifier(format!("Failed to load tokenizer: {}", e)))?
            }
            TokenizerFiles::Bpe { vocab, codes } => {
                tracing::debug!(
                    "Building BERTweet tokenizer from {} and {}",
                    vocab.display(),
                    codes.display()
                );
                build_bertweet_tokenizer(&vocab, &codes)?
            }
        };

        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: self.config.inference.max_length,
                ..Default::default()
            }))
            .map_err(|e| Error::classifier(format!("Failed to configure truncation: {}", e)))?;

        Ok(tokenizer)
    }
}

/// Tokenizer artifacts in one of the two supported layouts
#[derive(Debug, PartialEq)]
enum TokenizerFiles {
    Json(PathBuf),
    Bpe { vocab: PathBuf, codes: PathBuf },
}

/// Prefer `tokenizer.json`, fall back to the fastBPE pair
fn tokenizer_files_in(dir: &Path) -> Result<TokenizerFiles> {
    let json = dir.join(TOKENIZER_FILE);
    if json.exists() {
        return Ok(TokenizerFiles::Json(json));
    }

    let vocab = dir.join(VOCAB_FILE);
    let codes = dir.join(CODES_FILE);
    if vocab.exists() && codes.exists() {
        return Ok(TokenizerFiles::Bpe { vocab, codes });
    }

    Err(Error::classifier(format!(
        "Tokenizer not found in {} (tried {}, {} + {})",
        dir.display(),
        TOKENIZER_FILE,
        VOCAB_FILE,
        CODES_FILE
    )))
}

/// Download tokenizer files through the hub cache
fn fetch_tokenizer(repo: &str, revision: &str) -> Result<TokenizerFiles> {
    tracing::debug!("Fetching tokenizer from HuggingFace: {} @ {}", repo, revision);

    let api = Api::new()
        .map_err(|e| Error::classifier(format!("Failed to initialize HuggingFace API: {}", e)))?;
    let hub_repo = api.repo(Repo::with_revision(
        repo.to_string(),
        RepoType::Model,
        revision.to_string(),
    ));

    let json_err = match hub_repo.get(TOKENIZER_FILE) {
        Ok(path) => return Ok(TokenizerFiles::Json(path)),
        Err(e) => e,
    };
    tracing::debug!("{} unavailable ({}), trying {}", TOKENIZER_FILE, json_err, CODES_FILE);

    let fetch = |file: &str| {
        hub_repo.get(file).map_err(|e| {
            Error::classifier(format!(
                "Failed to resolve tokenizer '{}' ({}): no {} ({}) and no {} ({})",
                repo, revision, TOKENIZER_FILE, json_err, file, e
            ))
        })
    };

    Ok(TokenizerFiles::Bpe {
        vocab: fetch(VOCAB_FILE)?,
        codes: fetch(CODES_FILE)?,
    })
}

/// Parse a device string such as `cpu`, `cuda`, `cuda:1` or `metal`
pub fn get_device(device_str: &str) -> Result<Device> {
    let lowered = device_str.trim().to_lowercase();
    let (kind, index) = match lowered.split_once(':') {
        Some((kind, index)) => {
            let index = index.parse::<usize>().map_err(|_| {
                Error::config(format!("Invalid device index in '{}'", device_str))
            })?;
            (kind, index)
        }
        None => (lowered.as_str(), 0),
    };

    match kind {
        "cpu" => Ok(Device::Cpu),
        "cuda" => Device::new_cuda(index)
            .map_err(|e| Error::classifier(format!("Failed to initialize CUDA: {}", e))),
        "metal" | "mps" => Device::new_metal(index)
            .map_err(|e| Error::classifier(format!("Failed to initialize Metal: {}", e))),
        _ => Err(Error::config(format!("Unknown device '{}'", device_str))),
    }
}

fn parse_json_config<T: DeserializeOwned>(config_path: &Path) -> Result<T> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| {
        Error::classifier(format!(
            "Failed to read config {}: {}",
            config_path.display(),
            e
        ))
    })?;

    serde_json::from_str(&config_str).map_err(|e| {
        Error::classifier(format!(
            "Failed to parse config {}: {}",
            config_path.display(),
            e
        ))
    })
}

fn load_var_builder(model_path: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let weights_path = model_path.join(WEIGHTS_FILE);
    if !weights_path.exists() {
        return Err(Error::classifier(format!(
            "{} not found in {}; convert a TensorFlow checkpoint with \
             `AutoModelForSequenceClassification.from_pretrained(dir, from_tf=True)\
             .save_pretrained(dir, safe_serialization=True)`",
            WEIGHTS_FILE,
            model_path.display()
        )));
    }

    // SAFETY: the weights file is treated as read-only for the life of the process
    let vb = unsafe {
        VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)
            .map_err(|e| Error::classifier(format!("Failed to load weights: {}", e)))?
    };

    Ok(vb)
}

#[derive(Deserialize)]
struct LabelHints {
    #[serde(default)]
    id2label: Option<HashMap<String, String>>,
}

/// The checkpoint may carry its own label map; only its size is checked
fn warn_on_label_mismatch(model_path: &Path, configured: usize) {
    let Ok(hints) = parse_json_config::<LabelHints>(&model_path.join(CONFIG_FILE)) else {
        return;
    };

    if let Some(id2label) = hints.id2label {
        if id2label.len() != configured {
            tracing::warn!(
                "{} declares {} labels but {} are configured",
                CONFIG_FILE,
                id2label.len(),
                configured
            );
        }
    }
}
