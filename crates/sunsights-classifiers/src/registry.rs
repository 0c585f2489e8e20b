//! Classifier construction from configuration

use crate::adapter::MlClassifierAdapter;
use crate::classifier::Classifier;
use crate::emotion::LexiconEmotionClassifier;
use crate::model_config::{Backend, ClassifierConfig, ModelSpec};
use crate::model_loader::load_distilbert;
use crate::sentiment::LexiconSentimentClassifier;
use std::sync::Arc;
use sunsights_core::Result;
use tracing::{info, warn};

/// Which of the two adapter inputs a classifier serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Sentiment,
    Emotion,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sentiment => "sentiment",
            Self::Emotion => "emotion",
        }
    }

    fn lexicon(&self) -> Result<Arc<dyn Classifier>> {
        Ok(match self {
            Self::Sentiment => Arc::new(LexiconSentimentClassifier::new()?),
            Self::Emotion => Arc::new(LexiconEmotionClassifier::new()?),
        })
    }
}

/// Build the adapter described by `config`.
///
/// Models are loaded once, off the async runtime. A model that fails to
/// load is replaced by the lexicon classifier for that capability.
pub async fn build_adapter(config: &ClassifierConfig) -> Result<MlClassifierAdapter> {
    let (sentiment, emotion) = tokio::try_join!(
        load_capability(Capability::Sentiment, &config.sentiment),
        load_capability(Capability::Emotion, &config.emotion),
    )?;

    info!(
        sentiment = sentiment.name(),
        emotion = emotion.name(),
        timeout_ms = config.timeout_ms,
        "Classifiers ready"
    );

    Ok(MlClassifierAdapter::new(sentiment, emotion).with_timeout(config.timeout()))
}

async fn load_capability(capability: Capability, spec: &ModelSpec) -> Result<Arc<dyn Classifier>> {
    match spec.backend {
        Backend::Lexicon => capability.lexicon(),
        Backend::DistilBert => {
            let owned = spec.clone();
            let loaded = tokio::task::spawn_blocking(move || load_distilbert(&owned))
                .await
                .map_err(|e| {
                    sunsights_core::Error::internal(format!("Model loading task failed: {e}"))
                })?;

            match loaded {
                Ok(classifier) => Ok(Arc::from(classifier)),
                Err(e) => {
                    warn!(
                        capability = capability.as_str(),
                        model = %spec.name,
                        error = %e,
                        "Failed to load model, falling back to lexicon classifier"
                    );
                    capability.lexicon()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_config::ModelSource;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_lexicon_backends() {
        let adapter = build_adapter(&ClassifierConfig::lexicon()).await.unwrap();
        assert_eq!(adapter.sentiment_classifier().name(), "sentiment-lexicon");
        assert_eq!(adapter.emotion_classifier().name(), "emotion-lexicon");
    }

    #[tokio::test]
    async fn test_unloadable_model_falls_back_to_lexicon() {
        let mut config = ClassifierConfig::lexicon();
        config.sentiment.backend = Backend::DistilBert;
        config.sentiment.source = Some(ModelSource::Local {
            path: PathBuf::from("/nonexistent/sunsights-sst2"),
        });
        config.timeout_ms = 1_500;

        let adapter = build_adapter(&config).await.unwrap();
        assert_eq!(adapter.sentiment_classifier().name(), "sentiment-lexicon");
        assert_eq!(adapter.timeout().as_millis(), 1_500);
    }
}
