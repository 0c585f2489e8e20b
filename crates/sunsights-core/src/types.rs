//! Core types for Sunsights

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary polarity reported by a sentiment model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    /// Parse a model label (`POSITIVE`, `negative`, `LABEL_1`, ...)
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" | "POS" | "LABEL_1" => Some(Self::Positive),
            "NEGATIVE" | "NEG" | "LABEL_0" => Some(Self::Negative),
            _ => None,
        }
    }
}

/// Overall valence of a piece of feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Negative,
    Mixed,
    Unknown,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::Mixed => "MIXED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl From<Polarity> for Sentiment {
    fn from(polarity: Polarity) -> Self {
        match polarity {
            Polarity::Positive => Self::Positive,
            Polarity::Negative => Self::Negative,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fine-grained affect label.
///
/// Known labels are canonicalised to lower case; anything else a model
/// emits is carried through verbatim (lower-cased) as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Love,
    Neutral,
    Other(String),
}

impl Emotion {
    /// Canonicalise a raw model label
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        match label.as_str() {
            "joy" => Self::Joy,
            "sadness" => Self::Sadness,
            "anger" => Self::Anger,
            "fear" => Self::Fear,
            "surprise" => Self::Surprise,
            "love" => Self::Love,
            "neutral" => Self::Neutral,
            _ => Self::Other(label),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Joy => "joy",
            Self::Sadness => "sadness",
            Self::Anger => "anger",
            Self::Fear => "fear",
            Self::Surprise => "surprise",
            Self::Love => "love",
            Self::Neutral => "neutral",
            Self::Other(label) => label,
        }
    }

    /// Joy, love or surprise
    pub fn is_uplifting(&self) -> bool {
        matches!(self, Self::Joy | Self::Love | Self::Surprise)
    }
}

impl From<String> for Emotion {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<Emotion> for String {
    fn from(emotion: Emotion) -> Self {
        emotion.as_str().to_string()
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Triage urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combined output of the sentiment and emotion models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlResult {
    /// Top sentiment label
    pub sentiment_label: Polarity,

    /// Confidence of the sentiment label (0.0-1.0)
    pub sentiment_score: f32,

    /// Top emotion label, lower-cased
    pub emotion_label: String,
}

impl MlResult {
    /// Value used when the models cannot be reached
    pub fn fallback() -> Self {
        Self {
            sentiment_label: Polarity::Negative,
            sentiment_score: 0.5,
            emotion_label: "neutral".to_string(),
        }
    }

    pub fn emotion(&self) -> Emotion {
        Emotion::from_label(&self.emotion_label)
    }
}

/// Final classification of one piece of feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sentiment: Sentiment,

    /// Sentiment score scaled to 0-100
    pub sentiment_score: u8,

    pub emotion: Emotion,

    pub priority: Priority,

    /// At most three canned replies
    pub response_suggestions: Vec<String>,
}

impl AnalysisResult {
    /// Result for input that carries nothing to classify
    pub fn unknown(response_suggestions: Vec<String>) -> Self {
        Self {
            sentiment: Sentiment::Unknown,
            sentiment_score: 0,
            emotion: Emotion::Neutral,
            priority: Priority::Low,
            response_suggestions,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.sentiment == Sentiment::Unknown
    }
}

/// Scale a 0.0-1.0 score to an integer percentage
pub fn scale_score(score: f32) -> u8 {
    (score * 100.0).round().clamp(0.0, 100.0) as u8
}
