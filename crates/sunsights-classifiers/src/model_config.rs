//! Model configuration for the sentiment and emotion classifiers

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the two classifiers behind the adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Upper bound for one adapter call, both classifiers included
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "ModelSpec::default_sentiment")]
    pub sentiment: ModelSpec,

    #[serde(default = "ModelSpec::default_emotion")]
    pub emotion: ModelSpec,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            sentiment: ModelSpec::default_sentiment(),
            emotion: ModelSpec::default_emotion(),
        }
    }
}

impl ClassifierConfig {
    /// Parse from a YAML document
    pub fn from_yaml(yaml: &str) -> sunsights_core::Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            sunsights_core::Error::config(format!("Invalid classifier config: {e}"))
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Both classifiers on the keyword lexicons, no model download
    pub fn lexicon() -> Self {
        let mut config = Self::default();
        config.sentiment.backend = Backend::Lexicon;
        config.emotion.backend = Backend::Lexicon;
        config
    }
}

/// One classifier model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub backend: Backend,

    /// Where the weights come from; required by the DistilBERT backend
    #[serde(default)]
    pub source: Option<ModelSource>,

    /// Output labels in logit order. Empty means read `id2label` from the
    /// model's config.json
    #[serde(default)]
    pub labels: Vec<String>,

    #[serde(default)]
    pub inference: InferenceConfig,
}

impl ModelSpec {
    pub fn default_sentiment() -> Self {
        Self {
            name: "distilbert-sst2".to_string(),
            backend: Backend::DistilBert,
            source: Some(ModelSource::HuggingFace {
                repo: "distilbert-base-uncased-finetuned-sst-2-english".to_string(),
                revision: default_revision(),
            }),
            labels: vec!["NEGATIVE".to_string(), "POSITIVE".to_string()],
            inference: InferenceConfig::default(),
        }
    }

    pub fn default_emotion() -> Self {
        Self {
            name: "distilbert-emotion".to_string(),
            backend: Backend::DistilBert,
            source: Some(ModelSource::HuggingFace {
                repo: "bhadresh-savani/distilbert-base-uncased-emotion".to_string(),
                revision: default_revision(),
            }),
            labels: ["sadness", "joy", "love", "anger", "fear", "surprise"]
                .iter()
                .map(|l| l.to_string())
                .collect(),
            inference: InferenceConfig::default(),
        }
    }
}

/// Classifier implementation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Built-in keyword lexicon
    Lexicon,
    /// DistilBERT sequence classification via Candle
    #[default]
    #[serde(rename = "distilbert")]
    DistilBert,
}

/// Model source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModelSource {
    /// Load from local filesystem
    Local { path: PathBuf },

    /// Download from HuggingFace Hub
    HuggingFace {
        repo: String,
        #[serde(default = "default_revision")]
        revision: String,
    },
}

fn default_revision() -> String {
    "main".to_string()
}

/// Inference configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Device to run on (cpu, cuda, mps)
    #[serde(default = "default_device")]
    pub device: String,

    /// Maximum sequence length in tokens
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_max_length() -> usize {
    512
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
    fn test_defaults_point_at_distilbert_models() {
        let config = ClassifierConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.sentiment.backend, Backend::DistilBert);
        assert_eq!(config.emotion.labels.len(), 6);

        match &config.sentiment.source {
            Some(ModelSource::HuggingFace { repo, revision }) => {
                assert!(repo.contains("sst-2"));
                assert_eq!(revision, "main");
            }
            other => panic!("Expected HuggingFace source, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_classifier_config() {
        let yaml = r#"
timeout_ms: 2500
sentiment:
  name: "local-sst2"
  backend: distilbert
  source:
    type: local
    path: "./models/sst2"
  labels: [NEGATIVE, POSITIVE]
  inference:
    device: "cpu"
    max_length: 256
emotion:
  backend: lexicon
"#;

        let config = ClassifierConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.timeout_ms, 2500);
        assert_eq!(config.sentiment.inference.max_length, 256);
        assert_eq!(config.emotion.backend, Backend::Lexicon);
        assert!(config.emotion.source.is_none());

        match &config.sentiment.source {
            Some(ModelSource::Local { path }) => {
                assert_eq!(path.to_str().unwrap(), "./models/sst2");
            }
            _ => panic!("Expected local source"),
        }
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ClassifierConfig::from_yaml("{}").unwrap();
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.emotion.name, "distilbert-emotion");
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let err = ClassifierConfig::from_yaml("sentiment:\n  backend: gpt\n").unwrap_err();
        assert!(err.to_string().contains("Invalid classifier config"));
    }

    #[test]
    fn test_lexicon_preset() {
        let config = ClassifierConfig::lexicon();
        assert_eq!(config.sentiment.backend, Backend::Lexicon);
        assert_eq!(config.emotion.backend, Backend::Lexicon);
    }
}
