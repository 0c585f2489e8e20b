//! Lightweight sentiment classifier (Tier A fallback)
//!
//! This is a lexicon-based polarity classifier used when no sentiment model
//! is loaded. It reports `POSITIVE` or `NEGATIVE` with a confidence that
//! grows with the number of keyword hits.

use crate::classifier::{ClassificationMetadata, ClassificationResult, Classifier, ClassifierTier};
use aho_corasick::AhoCorasick;
use std::time::Instant;
use sunsights_core::Result;

pub struct LexiconSentimentClassifier {
    name: String,
    positive: AhoCorasick,
    negative: AhoCorasick,
}

impl LexiconSentimentClassifier {
    pub fn new() -> Result<Self> {
        Self::with_name("sentiment-lexicon")
    }

    pub fn with_name(name: impl Into<String>) -> Result<Self> {
        let positive = vec![
            "good",
            "great",
            "excellent",
            "love",
            "amazing",
            "wonderful",
            "happy",
            "fantastic",
            "awesome",
            "best",
            "perfect",
            "helpful",
            "recommend",
            "thank",
        ];
        let negative = vec![
            "bad",
            "terrible",
            "awful",
            "hate",
            "horrible",
            "worst",
            "sad",
            "angry",
            "disappointed",
            "poor",
            "broken",
            "slow",
            "refund",
            "never",
            "not",
        ];

        let positive = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(positive)
            .map_err(|e| {
                sunsights_core::Error::classifier(format!(
                    "Failed to build positive sentiment matcher: {e}"
                ))
            })?;

        let negative = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(negative)
            .map_err(|e| {
                sunsights_core::Error::classifier(format!(
                    "Failed to build negative sentiment matcher: {e}"
                ))
            })?;

        Ok(Self {
            name: name.into(),
            positive,
            negative,
        })
    }
}

#[async_trait::async_trait]
impl Classifier for LexiconSentimentClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();

        let positive_hits = self.positive.find_iter(text).count() as f32;
        let negative_hits = self.negative.find_iter(text).count() as f32;
        let total = positive_hits + negative_hits;

        let positive_share = if total == 0.0 {
            0.5
        } else {
            positive_hits / total
        };

        // Confidence approaches the hit share as evidence accumulates.
        let evidence = total / (total + 1.0);
        let confidence = 0.5 + (positive_share - 0.5).abs() * evidence;
        let label = if positive_share >= 0.5 {
            "POSITIVE"
        } else {
            "NEGATIVE"
        };
        let positive_score = if label == "POSITIVE" {
            confidence
        } else {
            1.0 - confidence
        };

        Ok(ClassificationResult {
            label: label.to_string(),
            score: confidence,
            metadata: ClassificationMetadata {
                model: Some(self.name.clone()),
                all_scores: Some(vec![
                    ("NEGATIVE".to_string(), 1.0 - positive_score),
                    ("POSITIVE".to_string(), positive_score),
                ]),
            },
            latency_us: start.elapsed().as_micros() as u64,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn tier(&self) -> ClassifierTier {
        ClassifierTier::A
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_positive_text() {
        let classifier = LexiconSentimentClassifier::new().unwrap();

        let result = classifier
            .classify("Great product, really helpful staff")
            .await
            .unwrap();
        assert_eq!(result.label, "POSITIVE");
        assert!(result.score > 0.5 && result.score < 1.0);
    }

    #[tokio::test]
    async fn test_negative_text() {
        let classifier = LexiconSentimentClassifier::new().unwrap();

        let result = classifier
            .classify("Terrible support and a broken charger")
            .await
            .unwrap();
        assert_eq!(result.label, "NEGATIVE");
        assert!(result.score > 0.5);
    }

    #[tokio::test]
    async fn test_no_evidence_is_a_coin_flip() {
        let classifier = LexiconSentimentClassifier::new().unwrap();

        let result = classifier.classify("The parcel arrived on Tuesday").await.unwrap();
        assert_eq!(result.score, 0.5);
    }
}
