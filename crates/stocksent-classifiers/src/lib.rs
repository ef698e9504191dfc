//! stocksent Classifiers
//!
//! Sentiment classification for stock tweets with pretrained transformer
//! checkpoints run on Candle.
//!
//! A [`ModelLoader`] reads the tokenizer and weights once and returns a
//! [`Classifier`]; every call to [`Classifier::classify`] yields all labels
//! ranked by probability.

pub mod bertweet;
pub mod classifier;
pub mod model_config;
pub mod model_loader;
pub mod sequence;

pub use bertweet::build_bertweet_tokenizer;
pub use classifier::{ClassificationResult, Classifier, Prediction};
pub use model_config::{
    ArchitectureConfig, InferenceConfig, ModelConfig, ModelSource, TokenizerSource,
};
pub use model_loader::ModelLoader;
pub use sequence::{BertSequenceClassifier, RobertaSequenceClassifier};
pub use stocksent_core::Sentiment;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{ClassificationResult, Classifier, Prediction};
    pub use crate::model_config::ModelConfig;
    pub use crate::model_loader::ModelLoader;
    pub use stocksent_core::Sentiment;
}
