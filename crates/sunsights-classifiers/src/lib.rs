//! Sunsights Classifiers
//!
//! The two inputs of the decision engine:
//! - [`PatternMatcher`]: phrase-list flags over normalized feedback text
//! - [`MlClassifierAdapter`]: sentiment polarity and emotion labels from
//!   pluggable [`Classifier`] implementations
//!
//! Classifiers are organized into tiers based on latency budgets:
//! - Tier A (<2ms): keyword lexicons
//! - Tier B (<250ms): DistilBERT models on CPU (feature `ml-models`)

pub mod adapter;
pub mod classifier;
pub mod emotion;
pub mod model_config;
pub mod model_loader;
pub mod patterns;
pub mod registry;
pub mod sentiment;

pub use adapter::{MlClassifierAdapter, DEFAULT_TIMEOUT};
pub use classifier::{
    run_blocking, ClassificationMetadata, ClassificationResult, Classifier, ClassifierTier,
};
pub use emotion::LexiconEmotionClassifier;
pub use model_config::{Backend, ClassifierConfig, InferenceConfig, ModelSource, ModelSpec};
pub use patterns::{PatternFlags, PatternMatcher};
pub use registry::{build_adapter, Capability};
pub use sentiment::LexiconSentimentClassifier;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::adapter::MlClassifierAdapter;
    pub use crate::classifier::{ClassificationResult, Classifier, ClassifierTier};
    pub use crate::patterns::{PatternFlags, PatternMatcher};
}
