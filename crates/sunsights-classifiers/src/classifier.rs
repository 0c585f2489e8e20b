//! The `Classifier` seam behind the adapter

use async_trait::async_trait;
use sunsights_core::{Error, Result};

/// A sentiment or emotion model, shared across requests
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Label `text` with the classifier's best guess
    async fn classify(&self, text: &str) -> Result<ClassificationResult>;

    /// Name used in logs and result metadata
    fn name(&self) -> &str;

    /// Latency class of this classifier
    fn tier(&self) -> ClassifierTier;
}

/// Best label for one text
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// Raw label as the model emits it
    pub label: String,

    /// Probability of `label`, 0.0-1.0
    pub score: f32,

    pub metadata: ClassificationMetadata,

    /// Wall time spent classifying, in microseconds
    pub latency_us: u64,
}

impl ClassificationResult {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
            metadata: ClassificationMetadata::default(),
            latency_us: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClassificationMetadata {
    /// Producing model, if any
    pub model: Option<String>,

    /// Every label with its probability, in model order
    pub all_scores: Option<Vec<(String, f32)>>,
}

/// Latency class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierTier {
    /// Keyword lexicons, under 2ms
    A,
    /// Transformer inference on CPU, under 250ms
    B,
}

impl ClassifierTier {
    /// Expected upper bound for one call, in microseconds
    pub fn latency_budget_us(&self) -> u64 {
        match self {
            Self::A => 2_000,
            Self::B => 250_000,
        }
    }
}

/// Run CPU-bound inference on the blocking thread pool.
///
/// The returned future stays pending until `work` finishes, so it can be
/// raced against a timeout or joined with other classifiers.
pub async fn run_blocking<T, F>(classifier: &str, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        Error::classifier(format!("{classifier} inference task failed: {e}"))
    })?
}
