//! Classifier trait and common types

use stocksent_core::{Result, Sentiment};

/// Trait for all sentiment classifiers
pub trait Classifier: Send + Sync {
    /// Classify the given text, returning every label ranked by score
    fn classify(&self, text: &str) -> Result<ClassificationResult>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// A single label with its confidence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Sentiment label
    pub label: Sentiment,

    /// Confidence score (0.0-1.0)
    pub score: f32,
}

impl Prediction {
    pub fn new(label: Sentiment, score: f32) -> Self {
        Self { label, score }
    }
}

/// Result of classifying one input
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// Predictions ordered by descending score
    pub predictions: Vec<Prediction>,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl ClassificationResult {
    /// Build a ranked result from per-label probabilities.
    ///
    /// `labels[i]` names `probabilities[i]`; extra entries on either side are ignored.
    pub fn from_probabilities(labels: &[Sentiment], probabilities: &[f32]) -> Self {
        let mut predictions: Vec<Prediction> = labels
            .iter()
            .zip(probabilities)
            .map(|(label, score)| Prediction::new(*label, *score))
            .collect();

        // Stable sort keeps label-id order between equal scores
        predictions.sort_by(|a, b| b.score.total_cmp(&a.score));

        Self {
            predictions,
            latency_us: 0,
        }
    }

    /// Attach the measured latency
    pub fn with_latency_us(mut self, latency_us: u64) -> Self {
        self.latency_us = latency_us;
        self
    }

    /// Highest-scoring prediction
    pub fn top(&self) -> Option<&Prediction> {
        self.predictions.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predictions_are_ranked() {
        let result = ClassificationResult::from_probabilities(&Sentiment::ALL, &[0.1, 0.25, 0.65]);

        let labels: Vec<Sentiment> = result.predictions.iter().map(|p| p.label).collect();
        assert_eq!(
            labels,
            vec![Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative]
        );
        assert_eq!(result.top().unwrap().score, 0.65);
        assert_eq!(result.predictions[2], Prediction::new(Sentiment::Negative, 0.1));
    }

    #[test]
    fn test_ties_keep_label_order() {
        let result = ClassificationResult::from_probabilities(&Sentiment::ALL, &[0.4, 0.4, 0.2]);
        assert_eq!(result.top().unwrap().label, Sentiment::Negative);
    }

    #[test]
    fn test_empty_probabilities_have_no_top() {
        let result = ClassificationResult::from_probabilities(&Sentiment::ALL, &[]);
        assert!(result.top().is_none());
    }

    #[test]
    fn test_builder_metadata() {
        let result = ClassificationResult::from_probabilities(&Sentiment::ALL, &[0.2, 0.3, 0.5])
            .with_latency_us(1500);

        assert_eq!(result.latency_us, 1500);
    }
}
