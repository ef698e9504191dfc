//! Sequence classifiers backed by Candle transformer encoders

use crate::classifier::{ClassificationResult, Classifier};
use crate::model_config::ModelConfig;
use candle_core::{Device, IndexOp, Tensor, D};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use candle_transformers::models::xlm_roberta::{
    Config as RobertaConfig, XLMRobertaForSequenceClassification,
};
use std::time::Instant;
use stocksent_core::{Error, Result, Sentiment};
use tokenizers::Tokenizer;

fn candle_err(context: &'static str) -> impl Fn(candle_core::Error) -> Error {
    move |e| Error::classifier(format!("{}: {}", context, e))
}

/// Model inputs for a single text, batch dimension included
struct EncodedInput {
    input_ids: Tensor,
    attention_mask: Tensor,
    token_type_ids: Tensor,
}

fn encode(tokenizer: &Tokenizer, text: &str, device: &Device) -> Result<EncodedInput> {
    let encoding = tokenizer
        .encode(text, true)
        .map_err(|e| Error::classifier(format!("Tokenization failed: {}", e)))?;

    let to_tensor = |values: &[u32], what: &'static str| -> Result<Tensor> {
        Tensor::new(values, device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(candle_err(what))
    };

    Ok(EncodedInput {
        input_ids: to_tensor(encoding.get_ids(), "Failed to create input ids tensor")?,
        attention_mask: to_tensor(
            encoding.get_attention_mask(),
            "Failed to create attention mask tensor",
        )?,
        token_type_ids: to_tensor(
            encoding.get_type_ids(),
            "Failed to create token type ids tensor",
        )?,
    })
}

/// Softmax over the label dimension of `(1, num_labels)` logits
fn to_probabilities(logits: &Tensor) -> Result<Vec<f32>> {
    candle_nn::ops::softmax(logits, D::Minus1)
        .and_then(|probs| probs.squeeze(0))
        .and_then(|probs| probs.to_vec1::<f32>())
        .map_err(candle_err("Failed to compute probabilities"))
}

fn build_result(
    name: &str,
    labels: &[Sentiment],
    probabilities: Vec<f32>,
    start: Instant,
) -> Result<ClassificationResult> {
    if probabilities.len() != labels.len() {
        return Err(Error::classifier(format!(
            "Model produced {} scores for {} labels",
            probabilities.len(),
            labels.len()
        )));
    }

    let result = ClassificationResult::from_probabilities(labels, &probabilities)
        .with_latency_us(start.elapsed().as_micros() as u64);

    if let Some(top) = result.top() {
        tracing::debug!(
            model = name,
            label = %top.label,
            score = top.score,
            latency_us = result.latency_us,
            "Classified input"
        );
    }

    Ok(result)
}

/// RoBERTa-family classifier (BERTweet checkpoints)
pub struct RobertaSequenceClassifier {
    name: String,
    tokenizer: Tokenizer,
    model: XLMRobertaForSequenceClassification,
    device: Device,
    labels: Vec<Sentiment>,
}

impl RobertaSequenceClassifier {
    /// Build from an already-resolved tokenizer and weight store
    pub fn load(
        config: &ModelConfig,
        roberta_config: &RobertaConfig,
        vb: VarBuilder,
        tokenizer: Tokenizer,
        device: Device,
    ) -> Result<Self> {
        let model =
            XLMRobertaForSequenceClassification::new(config.labels.len(), roberta_config, vb)
                .map_err(candle_err("Failed to load RoBERTa sequence model"))?;

        Ok(Self {
            name: config.name.clone(),
            tokenizer,
            model,
            device,
            labels: config.labels.clone(),
        })
    }
}

impl Classifier for RobertaSequenceClassifier {
    fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();
        let input = encode(&self.tokenizer, text, &self.device)?;

        let logits = self
            .model
            .forward(&input.input_ids, &input.attention_mask, &input.token_type_ids)
            .map_err(candle_err("Model forward pass failed"))?;

        build_result(&self.name, &self.labels, to_probabilities(&logits)?, start)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// BERT classifier: encoder, tanh pooler over `[CLS]`, linear head
pub struct BertSequenceClassifier {
    name: String,
    tokenizer: Tokenizer,
    model: BertModel,
    pooler: Linear,
    classifier: Linear,
    device: Device,
    labels: Vec<Sentiment>,
}

impl BertSequenceClassifier {
    /// Build from an already-resolved tokenizer and weight store
    pub fn load(
        config: &ModelConfig,
        bert_config: &BertConfig,
        vb: VarBuilder,
        tokenizer: Tokenizer,
        device: Device,
    ) -> Result<Self> {
        let (model, backbone_vb) = load_bert_backbone(&vb, bert_config)?;

        let hidden_size = bert_config.hidden_size;
        let pooler = candle_nn::linear(hidden_size, hidden_size, backbone_vb.pp("pooler.dense"))
            .map_err(candle_err("Failed to load pooler"))?;
        let classifier = candle_nn::linear(hidden_size, config.labels.len(), vb.pp("classifier"))
            .map_err(candle_err("Failed to load classification head"))?;

        Ok(Self {
            name: config.name.clone(),
            tokenizer,
            model,
            pooler,
            classifier,
            device,
            labels: config.labels.clone(),
        })
    }
}

/// Checkpoints exported from `BertForSequenceClassification` nest the encoder under `bert`
fn load_bert_backbone<'a>(
    vb: &VarBuilder<'a>,
    config: &BertConfig,
) -> Result<(BertModel, VarBuilder<'a>)> {
    let mut errors = Vec::new();

    for prefix in ["bert", ""] {
        let vb_prefix = if prefix.is_empty() {
            vb.clone()
        } else {
            vb.pp(prefix)
        };

        match BertModel::load(vb_prefix.clone(), config) {
            Ok(model) => {
                tracing::debug!(
                    "Loaded BERT backbone from '{}'",
                    if prefix.is_empty() { "<root>" } else { prefix }
                );
                return Ok((model, vb_prefix));
            }
            Err(e) => errors.push(format!(
                "{}: {}",
                if prefix.is_empty() { "<root>" } else { prefix },
                e
            )),
        }
    }

    Err(Error::classifier(format!(
        "Failed to load BERT backbone with tried prefixes [{}]",
        errors.join(" | ")
    )))
}

impl Classifier for BertSequenceClassifier {
    fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();
        let input = encode(&self.tokenizer, text, &self.device)?;

        let hidden_states = self
            .model
            .forward(
                &input.input_ids,
                &input.token_type_ids,
                Some(&input.attention_mask),
            )
            .map_err(candle_err("Model forward pass failed"))?;

        let logits = hidden_states
            .i((.., 0))
            .and_then(|cls| self.pooler.forward(&cls))
            .and_then(|pooled| pooled.tanh())
            .and_then(|pooled| self.classifier.forward(&pooled))
            .map_err(candle_err("Classification head failed"))?;

        build_result(&self.name, &self.labels, to_probabilities(&logits)?, start)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_probabilities_sums_to_one() {
        let logits = Tensor::new(&[[1.0f32, 2.0, 3.0]], &Device::Cpu).unwrap();
        let probs = to_probabilities(&logits).unwrap();

        assert_eq!(probs.len(), 3);
        let total: f32 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-5, "got {}", total);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn test_build_result_ranks_labels() {
        let result =
            build_result("test", &Sentiment::ALL, vec![0.7, 0.2, 0.1], Instant::now()).unwrap();

        let top = result.top().unwrap();
        assert_eq!(top.label, Sentiment::Negative);
        assert_eq!(top.score, 0.7);
    }

    #[test]
    fn test_build_result_rejects_label_count_mismatch() {
        let result = build_result("test", &Sentiment::ALL, vec![0.5, 0.5], Instant::now());
        assert!(result.is_err());
    }
}
