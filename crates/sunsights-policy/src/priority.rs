//! Triage priority

use sunsights_classifiers::patterns::{contains_any, PatternFlags};
use sunsights_core::{Emotion, Priority};

/// Words that pull mixed feedback back to medium priority
pub const CONCERN_WORDS: &[&str] = &[
    "concern",
    "concerned",
    "worry",
    "worried",
    "issue",
    "issues",
    "problem",
    "problems",
    "reliability",
    "unreliable",
];

/// Priority from the final emotion and 0-1 score alone
pub fn base_priority(score: f32, emotion: &Emotion) -> Priority {
    let disgust = matches!(emotion, Emotion::Other(label) if label == "disgust");

    if matches!(emotion, Emotion::Anger | Emotion::Fear)
        || score < 0.3
        || (score < 0.4 && (*emotion == Emotion::Sadness || disgust))
    {
        Priority::High
    } else if score < 0.5 || *emotion == Emotion::Sadness {
        Priority::Medium
    } else if *emotion == Emotion::Surprise && (0.4..=0.6).contains(&score) {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// Base priority with the mixed-concern and functionality overrides applied.
///
/// The mixed-concern override sets Medium even when anger or fear raised the
/// base to High. The functionality override is applied last, so a
/// functionality complaint is always High.
pub fn derive_priority(score: f32, emotion: &Emotion, flags: &PatternFlags, text: &str) -> Priority {
    let mut priority = base_priority(score, emotion);

    if flags.is_mixed_sentiment && contains_any(text, CONCERN_WORDS) {
        priority = Priority::Medium;
    }
    if flags.has_functionality_issue {
        priority = Priority::High;
    }

    priority
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anger_and_fear_are_high() {
        assert_eq!(base_priority(0.99, &Emotion::Anger), Priority::High);
        assert_eq!(base_priority(0.99, &Emotion::Fear), Priority::High);
    }

    #[test]
    fn test_score_thresholds() {
        assert_eq!(base_priority(0.2, &Emotion::Joy), Priority::High);
        assert_eq!(base_priority(0.35, &Emotion::Sadness), Priority::High);
        assert_eq!(
            base_priority(0.35, &Emotion::Other("disgust".to_string())),
            Priority::High
        );
        assert_eq!(base_priority(0.35, &Emotion::Joy), Priority::Medium);
        assert_eq!(base_priority(0.45, &Emotion::Neutral), Priority::Medium);
        assert_eq!(base_priority(0.9, &Emotion::Sadness), Priority::Medium);
        assert_eq!(base_priority(0.9, &Emotion::Joy), Priority::Low);
    }

    #[test]
    fn test_mid_range_surprise_is_medium() {
        assert_eq!(base_priority(0.55, &Emotion::Surprise), Priority::Medium);
        assert_eq!(base_priority(0.6, &Emotion::Surprise), Priority::Medium);
        assert_eq!(base_priority(0.9, &Emotion::Surprise), Priority::Low);
    }

    #[test]
    fn test_mixed_concern_forces_medium() {
        let flags = PatternFlags {
            is_mixed_sentiment: true,
            ..Default::default()
        };
        assert_eq!(
            derive_priority(0.1, &Emotion::Anger, &flags, "some reliability doubts"),
            Priority::Medium
        );
        // Without a concern word the base priority stands
        assert_eq!(
            derive_priority(0.1, &Emotion::Anger, &flags, "somewhat slow"),
            Priority::High
        );
    }

    #[test]
    fn test_mixed_concern_lowers_fear() {
        let flags = PatternFlags {
            is_mixed_sentiment: true,
            ..Default::default()
        };
        assert_eq!(base_priority(0.8, &Emotion::Fear), Priority::High);
        assert_eq!(
            derive_priority(0.8, &Emotion::Fear, &flags, "nice app, but I worry about my data"),
            Priority::Medium
        );
    }

    #[test]
    fn test_functionality_issue_wins_last() {
        let flags = PatternFlags {
            is_mixed_sentiment: true,
            has_functionality_issue: true,
            ..Default::default()
        };
        assert_eq!(
            derive_priority(0.99, &Emotion::Joy, &flags, "an issue, it doesn't work"),
            Priority::High
        );
    }
}
