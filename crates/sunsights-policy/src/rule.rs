//! Ordered decision rules
//!
//! Each rule pairs a predicate over the pattern flags and model output with
//! the verdict it produces. [`DECISION_TABLE`] is evaluated top to bottom
//! and the first matching rule wins; the last entry always matches.

use serde::Serialize;
use sunsights_classifiers::patterns::{contains_any, PatternFlags};
use sunsights_core::{Emotion, MlResult, Polarity, Sentiment};

/// Phrases that make a `joy` label on negative text implausible
pub const NEGATIVE_POLARITY: &[&str] = &[
    "not good",
    "not great",
    "not bad but",
    "bad",
    "awful",
    "terrible",
    "horrible",
];

/// Everything a rule may look at
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    /// Lower-cased, trimmed input
    pub text: &'a str,
    pub flags: &'a PatternFlags,
    pub ml: &'a MlResult,
}

impl DecisionContext<'_> {
    fn contains(&self, phrases: &[&str]) -> bool {
        contains_any(self.text, phrases)
    }

    fn ml_sentiment(&self) -> Sentiment {
        self.ml.sentiment_label.into()
    }

    /// Model emotion if uplifting, joy otherwise
    fn uplifting_emotion(&self) -> Emotion {
        let emotion = self.ml.emotion();
        if emotion.is_uplifting() {
            emotion
        } else {
            Emotion::Joy
        }
    }

    /// Negative text the emotion model still labelled as joy
    fn joy_on_negative_text(&self, sentiment: Sentiment, emotion: &Emotion) -> bool {
        sentiment == Sentiment::Negative
            && *emotion == Emotion::Joy
            && self.contains(NEGATIVE_POLARITY)
    }
}

/// Sentiment, 0-1 score and emotion chosen by a rule
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub sentiment: Sentiment,
    pub score: f32,
    pub emotion: Emotion,
}

impl Verdict {
    fn new(sentiment: Sentiment, score: f32, emotion: Emotion) -> Self {
        Self {
            sentiment,
            score,
            emotion,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    DoubleNegative,
    ContrastiveBut,
    ConfidentNegative,
    ConfidentPositive,
    ConfidentMixed,
    MixedCues,
    Surprise,
    Love,
    ModelVerdict,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DoubleNegative => "double_negative",
            Self::ContrastiveBut => "contrastive_but",
            Self::ConfidentNegative => "confident_negative",
            Self::ConfidentPositive => "confident_positive",
            Self::ConfidentMixed => "confident_mixed",
            Self::MixedCues => "mixed_cues",
            Self::Surprise => "surprise",
            Self::Love => "love",
            Self::ModelVerdict => "model_verdict",
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry of the decision table
pub struct DecisionRule {
    pub id: RuleId,
    pub description: &'static str,
    predicate: fn(&DecisionContext<'_>) -> bool,
    outcome: fn(&DecisionContext<'_>) -> Verdict,
}

impl DecisionRule {
    pub fn matches(&self, ctx: &DecisionContext<'_>) -> bool {
        (self.predicate)(ctx)
    }

    pub fn apply(&self, ctx: &DecisionContext<'_>) -> Verdict {
        (self.outcome)(ctx)
    }
}

impl std::fmt::Debug for DecisionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionRule")
            .field("id", &self.id)
            .field("description", &self.description)
            .finish()
    }
}

pub const DECISION_TABLE: &[DecisionRule] = &[
    DecisionRule {
        id: RuleId::DoubleNegative,
        description: "negated negative reads as mild praise",
        predicate: |ctx| ctx.flags.has_double_negative,
        outcome: |ctx| Verdict::new(Sentiment::Positive, 0.6, ctx.uplifting_emotion()),
    },
    DecisionRule {
        id: RuleId::ContrastiveBut,
        description: "any \"but\" marks the text as mixed",
        predicate: |ctx| ctx.flags.has_but,
        outcome: |_| Verdict::new(Sentiment::Mixed, 0.45, Emotion::Neutral),
    },
    DecisionRule {
        id: RuleId::ConfidentNegative,
        description: "model is sure the text is negative",
        predicate: |ctx| ctx.ml.sentiment_label == Polarity::Negative && ctx.ml.sentiment_score > 0.95,
        outcome: confident_negative,
    },
    DecisionRule {
        id: RuleId::ConfidentPositive,
        description: "model is sure the text is positive",
        predicate: |ctx| ctx.ml.sentiment_label == Polarity::Positive && ctx.ml.sentiment_score > 0.95,
        outcome: |ctx| {
            let emotion = if ctx.flags.is_love_expression {
                Emotion::Love
            } else if ctx.flags.is_surprise_expression {
                Emotion::Surprise
            } else {
                ctx.uplifting_emotion()
            };
            Verdict::new(Sentiment::Positive, ctx.ml.sentiment_score, emotion)
        },
    },
    DecisionRule {
        id: RuleId::ConfidentMixed,
        description: "both polarities present but the model is confident",
        predicate: |ctx| {
            ctx.flags.is_mixed_sentiment
                && ctx.flags.has_positive
                && ctx.flags.has_negative
                && ctx.ml.sentiment_score > 0.9
        },
        outcome: |ctx| Verdict::new(ctx.ml_sentiment(), ctx.ml.sentiment_score, ctx.ml.emotion()),
    },
    DecisionRule {
        id: RuleId::MixedCues,
        description: "mixed-sentiment cue phrases",
        predicate: |ctx| ctx.flags.is_mixed_sentiment,
        outcome: |ctx| {
            let score = if ctx.flags.has_positive && ctx.flags.has_negative {
                0.45
            } else {
                0.5
            };
            let emotion = if ctx.contains(&["but overall good", "but i like"]) {
                Emotion::Joy
            } else if ctx.contains(&[
                "but overall bad",
                "but i dislike",
                "concern",
                "worried",
                "issue",
                "problem",
            ]) {
                Emotion::Sadness
            } else {
                Emotion::Neutral
            };
            Verdict::new(Sentiment::Mixed, score, emotion)
        },
    },
    DecisionRule {
        id: RuleId::Surprise,
        description: "surprise expression",
        predicate: |ctx| ctx.flags.is_surprise_expression,
        outcome: |_| Verdict::new(Sentiment::Positive, 0.9, Emotion::Surprise),
    },
    DecisionRule {
        id: RuleId::Love,
        description: "love expression",
        predicate: |ctx| ctx.flags.is_love_expression,
        outcome: |_| Verdict::new(Sentiment::Positive, 0.95, Emotion::Love),
    },
    DecisionRule {
        id: RuleId::ModelVerdict,
        description: "model output with keyword emotion overrides",
        predicate: |_| true,
        outcome: model_verdict,
    },
];

fn confident_negative(ctx: &DecisionContext<'_>) -> Verdict {
    let mut score = ctx.ml.sentiment_score;
    let emotion = if ctx.flags.is_anger_expression || ctx.contains(&["hate"]) {
        score = score.max(0.85);
        Emotion::Anger
    } else if ctx.flags.is_sadness_expression || ctx.contains(&["disappointed", "let down", "sad"]) {
        Emotion::Sadness
    } else if ctx.contains(&["worried", "worry", "won't work"]) {
        Emotion::Fear
    } else {
        let emotion = ctx.ml.emotion();
        if ctx.joy_on_negative_text(Sentiment::Negative, &emotion) {
            Emotion::Sadness
        } else {
            emotion
        }
    };
    Verdict::new(Sentiment::Negative, score, emotion)
}

fn model_verdict(ctx: &DecisionContext<'_>) -> Verdict {
    let sentiment = ctx.ml_sentiment();
    let emotion = ctx.ml.emotion();
    let emotion = if ctx.contains(&["worried", "worry"]) {
        Emotion::Fear
    } else if ctx.contains(&["disappointed", "let down"]) {
        Emotion::Sadness
    } else if ctx.contains(&["hate", "furious"]) {
        Emotion::Anger
    } else if ctx.joy_on_negative_text(sentiment, &emotion) {
        Emotion::Sadness
    } else {
        emotion
    };
    Verdict::new(sentiment, ctx.ml.sentiment_score, emotion)
}

/// Run the decision table and return the first rule that fires
pub fn evaluate(ctx: &DecisionContext<'_>) -> (RuleId, Verdict) {
    DECISION_TABLE
        .iter()
        .find(|rule| rule.matches(ctx))
        .map(|rule| (rule.id, rule.apply(ctx)))
        .unwrap_or_else(|| (RuleId::ModelVerdict, model_verdict(ctx)))
}
