//! Feedback analysis engine

use crate::priority::derive_priority;
use crate::rule::{evaluate, DecisionContext, RuleId};
use crate::suggestions::{suggest, CLARIFICATION};
use futures::stream::{self, StreamExt};
use sunsights_classifiers::{MlClassifierAdapter, PatternFlags, PatternMatcher};
use sunsights_core::{scale_score, AnalysisResult, MlResult, Result};
use tracing::{debug, warn};

/// Texts classified at the same time by [`SentimentAnalyzer::analyze_many`]
pub const BULK_CONCURRENCY: usize = 8;

/// Hybrid rule/model feedback analyzer.
///
/// Holds no per-call state; share it behind an `Arc`.
pub struct SentimentAnalyzer {
    matcher: PatternMatcher,
    adapter: MlClassifierAdapter,
}

/// Analysis result together with how it was reached
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub result: AnalysisResult,

    /// Rule that fired; `None` when the input guard short-circuited
    pub rule: Option<RuleId>,

    pub flags: PatternFlags,

    /// Whether the model output was replaced by the fixed fallback
    pub classifier_fallback: bool,
}

impl SentimentAnalyzer {
    pub fn new(adapter: MlClassifierAdapter) -> Result<Self> {
        Ok(Self {
            matcher: PatternMatcher::new()?,
            adapter,
        })
    }

    /// Classify one piece of feedback. Never fails.
    pub async fn analyze(&self, text: &str) -> AnalysisResult {
        self.evaluate(text).await.result
    }

    /// Classify many texts, keeping input order.
    ///
    /// Blank entries yield `None` and are never classified.
    pub async fn analyze_many<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<Option<AnalysisResult>> {
        stream::iter(texts)
            .map(|text| async move {
                let text = text.as_ref();
                if text.trim().is_empty() {
                    None
                } else {
                    Some(self.analyze(text).await)
                }
            })
            .boxed()
            .buffered(BULK_CONCURRENCY)
            .collect()
            .await
    }

    /// Classify one piece of feedback and report the rule that decided it
    pub async fn evaluate(&self, text: &str) -> Evaluation {
        let normalized = text.trim().to_lowercase();

        if normalized.is_empty() {
            return Evaluation::guarded(AnalysisResult::unknown(Vec::new()));
        }
        if !normalized.chars().any(char::is_alphabetic) {
            return Evaluation::guarded(AnalysisResult::unknown(vec![CLARIFICATION.to_string()]));
        }

        let flags = self.matcher.detect(&normalized);

        let (ml, classifier_fallback) = match self.adapter.classify(text).await {
            Ok(ml) => (ml, false),
            Err(e) => {
                warn!(error = %e, "Classifier unavailable, using fallback result");
                (MlResult::fallback(), true)
            }
        };

        let ctx = DecisionContext {
            text: &normalized,
            flags: &flags,
            ml: &ml,
        };
        let (rule, verdict) = evaluate(&ctx);

        let priority = derive_priority(verdict.score, &verdict.emotion, &flags, &normalized);
        let response_suggestions = suggest(verdict.sentiment, &verdict.emotion);

        debug!(
            rule = %rule,
            flags = ?flags.active(),
            sentiment = %verdict.sentiment,
            emotion = %verdict.emotion,
            score = verdict.score,
            priority = %priority,
            "Feedback classified"
        );

        Evaluation {
            result: AnalysisResult {
                sentiment: verdict.sentiment,
                sentiment_score: scale_score(verdict.score),
                emotion: verdict.emotion,
                priority,
                response_suggestions,
            },
            rule: Some(rule),
            flags,
            classifier_fallback,
        }
    }
}

impl Evaluation {
    fn guarded(result: AnalysisResult) -> Self {
        Self {
            result,
            rule: None,
            flags: PatternFlags::default(),
            classifier_fallback: false,
        }
    }
}
