//! ML classifier adapter
//!
//! Runs the sentiment and emotion classifiers side by side and folds their
//! top labels into an [`MlResult`]. Any failure, an unrecognised polarity
//! label or the timeout elapsing is returned as an error; recovering from
//! it is the caller's job.

use crate::classifier::{ClassificationResult, Classifier};
use crate::emotion::LexiconEmotionClassifier;
use crate::sentiment::LexiconSentimentClassifier;
use std::sync::Arc;
use std::time::Duration;
use sunsights_core::{Error, MlResult, Polarity, Result};
use tracing::debug;

/// Default bound on one adapter call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct MlClassifierAdapter {
    sentiment: Arc<dyn Classifier>,
    emotion: Arc<dyn Classifier>,
    timeout: Duration,
}

impl MlClassifierAdapter {
    pub fn new(sentiment: Arc<dyn Classifier>, emotion: Arc<dyn Classifier>) -> Self {
        Self {
            sentiment,
            emotion,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adapter over the built-in lexicon classifiers
    pub fn lexicon() -> Result<Self> {
        Ok(Self::new(
            Arc::new(LexiconSentimentClassifier::new()?),
            Arc::new(LexiconEmotionClassifier::new()?),
        ))
    }

    pub fn sentiment_classifier(&self) -> &dyn Classifier {
        self.sentiment.as_ref()
    }

    pub fn emotion_classifier(&self) -> &dyn Classifier {
        self.emotion.as_ref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Classify `text` with both models
    pub async fn classify(&self, text: &str) -> Result<MlResult> {
        let both = async {
            tokio::try_join!(self.sentiment.classify(text), self.emotion.classify(text))
        };

        let (sentiment, emotion) = tokio::time::timeout(self.timeout, both)
            .await
            .map_err(|_| Error::Timeout)??;

        self.note_latency(self.sentiment.as_ref(), &sentiment);
        self.note_latency(self.emotion.as_ref(), &emotion);

        let sentiment_label = Polarity::from_label(&sentiment.label).ok_or_else(|| {
            Error::classifier(format!(
                "{} returned unknown sentiment label '{}'",
                self.sentiment.name(),
                sentiment.label
            ))
        })?;

        Ok(MlResult {
            sentiment_label,
            sentiment_score: sentiment.score.clamp(0.0, 1.0),
            emotion_label: emotion.label.trim().to_lowercase(),
        })
    }

    fn note_latency(&self, classifier: &dyn Classifier, result: &ClassificationResult) {
        let budget = classifier.tier().latency_budget_us();
        if result.latency_us > budget {
            debug!(
                classifier = classifier.name(),
                latency_us = result.latency_us,
                budget_us = budget,
                "Classifier exceeded its tier latency budget"
            );
        }
    }
}

impl std::fmt::Debug for MlClassifierAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MlClassifierAdapter")
            .field("sentiment", &self.sentiment.name())
            .field("emotion", &self.emotion.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
