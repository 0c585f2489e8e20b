//! Mock classifiers for testing
//!
//! Configurable implementations of the Classifier trait used to drive the
//! adapter through its success, failure and timeout paths.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use sunsights_classifiers::{
    run_blocking, ClassificationResult, Classifier, ClassifierTier, MlClassifierAdapter,
};
use sunsights_core::{Error, Polarity, Result};

/// Returns a fixed label and score
pub struct MockClassifier {
    name: String,
    label: String,
    score: f32,
    simulated_latency: Option<Duration>,
    call_count: AtomicU32,
}

impl MockClassifier {
    pub fn new(name: &str, label: &str, score: f32) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            score,
            simulated_latency: None,
            call_count: AtomicU32::new(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = Some(latency);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassificationResult> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        if let Some(latency) = self.simulated_latency {
            tokio::time::sleep(latency).await;
        }

        let mut result = ClassificationResult::new(self.label.clone(), self.score);
        result.latency_us = self
            .simulated_latency
            .map(|d| d.as_micros() as u64)
            .unwrap_or(100);
        Ok(result)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn tier(&self) -> ClassifierTier {
        ClassifierTier::B
    }
}

/// A classifier that always fails - for testing error paths
pub struct FailingClassifier;

#[async_trait]
impl Classifier for FailingClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassificationResult> {
        Err(Error::classifier("model offline"))
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn tier(&self) -> ClassifierTier {
        ClassifierTier::B
    }
}

/// Holds a thread for the whole inference, like a CPU-bound model
pub struct BlockingClassifier {
    label: &'static str,
    inference_time: Duration,
}

impl BlockingClassifier {
    pub fn new(label: &'static str, inference_time: Duration) -> Self {
        Self {
            label,
            inference_time,
        }
    }
}

#[async_trait]
impl Classifier for BlockingClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassificationResult> {
        let label = self.label;
        let inference_time = self.inference_time;

        run_blocking(self.name(), move || {
            std::thread::sleep(inference_time);
            Ok(ClassificationResult::new(label, 0.9))
        })
        .await
    }

    fn name(&self) -> &str {
        "blocking"
    }

    fn tier(&self) -> ClassifierTier {
        ClassifierTier::B
    }
}

fn adapter(sentiment: impl Classifier + 'static, emotion: impl Classifier + 'static) -> MlClassifierAdapter {
    MlClassifierAdapter::new(Arc::new(sentiment), Arc::new(emotion))
}

#[tokio::test]
async fn test_adapter_combines_both_classifiers() {
    let sentiment = Arc::new(MockClassifier::new("sst2", "POSITIVE", 0.97));
    let emotion = Arc::new(MockClassifier::new("emotion", "Joy", 0.8));
    let adapter = MlClassifierAdapter::new(sentiment.clone(), emotion.clone());

    let result = adapter.classify("Lovely shop").await.unwrap();
    assert_eq!(result.sentiment_label, Polarity::Positive);
    assert_eq!(result.sentiment_score, 0.97);
    assert_eq!(result.emotion_label, "joy");

    assert_eq!(sentiment.call_count(), 1);
    assert_eq!(emotion.call_count(), 1);
}

#[tokio::test]
async fn test_hub_style_labels_are_accepted() {
    let adapter = adapter(
        MockClassifier::new("sst2", "LABEL_0", 0.88),
        MockClassifier::new("emotion", "sadness", 0.6),
    );

    let result = adapter.classify("meh").await.unwrap();
    assert_eq!(result.sentiment_label, Polarity::Negative);
}

#[tokio::test]
async fn test_failure_of_either_classifier_is_an_error() {
    let adapter_a = adapter(FailingClassifier, MockClassifier::new("emotion", "joy", 0.9));
    let err = adapter_a.classify("text").await.unwrap_err();
    assert!(matches!(err, Error::Classifier(_)));

    let adapter_b = adapter(MockClassifier::new("sst2", "POSITIVE", 0.9), FailingClassifier);
    assert!(adapter_b.classify("text").await.is_err());
}

#[tokio::test]
async fn test_unknown_polarity_label_is_an_error() {
    let adapter = adapter(
        MockClassifier::new("sst2", "NEUTRAL", 0.7),
        MockClassifier::new("emotion", "joy", 0.9),
    );

    let err = adapter.classify("text").await.unwrap_err();
    assert!(err.to_string().contains("NEUTRAL"));
}

#[tokio::test]
async fn test_score_is_clamped() {
    let adapter = adapter(
        MockClassifier::new("sst2", "POSITIVE", 1.3),
        MockClassifier::new("emotion", "joy", 0.9),
    );

    let result = adapter.classify("text").await.unwrap();
    assert_eq!(result.sentiment_score, 1.0);
}

#[tokio::test(start_paused = true)]
async fn test_slow_classifier_times_out() {
    let adapter = adapter(
        MockClassifier::new("sst2", "POSITIVE", 0.9).with_latency(Duration::from_secs(30)),
        MockClassifier::new("emotion", "joy", 0.9),
    )
    .with_timeout(Duration::from_secs(2));

    let err = adapter.classify("text").await.unwrap_err();
    assert!(matches!(err, Error::Timeout));
}

#[tokio::test(start_paused = true)]
async fn test_classifiers_run_concurrently() {
    let adapter = adapter(
        MockClassifier::new("sst2", "POSITIVE", 0.9).with_latency(Duration::from_millis(600)),
        MockClassifier::new("emotion", "joy", 0.9).with_latency(Duration::from_millis(600)),
    )
    .with_timeout(Duration::from_millis(1_000));

    // Sequential execution would need 1.2s and hit the timeout
    assert!(adapter.classify("text").await.is_ok());
}

#[tokio::test]
async fn test_blocking_inference_times_out() {
    let adapter = adapter(
        BlockingClassifier::new("POSITIVE", Duration::from_millis(400)),
        BlockingClassifier::new("joy", Duration::from_millis(400)),
    )
    .with_timeout(Duration::from_millis(50));

    let start = Instant::now();
    let err = adapter.classify("text").await.unwrap_err();

    assert!(matches!(err, Error::Timeout));
    assert!(start.elapsed() < Duration::from_millis(300), "took {:?}", start.elapsed());
}

#[tokio::test]
async fn test_blocking_inference_runs_in_parallel() {
    let adapter = adapter(
        BlockingClassifier::new("NEGATIVE", Duration::from_millis(250)),
        BlockingClassifier::new("sadness", Duration::from_millis(250)),
    )
    .with_timeout(Duration::from_secs(5));

    let start = Instant::now();
    let result = adapter.classify("text").await.unwrap();

    assert_eq!(result.sentiment_label, Polarity::Negative);
    assert_eq!(result.emotion_label, "sadness");
    // One inference after the other would need at least 500ms
    assert!(start.elapsed() < Duration::from_millis(450), "took {:?}", start.elapsed());
}
