//! Canned response suggestions

use sunsights_core::{Emotion, Sentiment};

/// Most suggestions returned for one result
pub const MAX_SUGGESTIONS: usize = 3;

/// Only suggestion for input without any letters
pub const CLARIFICATION: &str =
    "Could you share a little more detail about your experience so we can help?";

fn sentiment_templates(sentiment: Sentiment) -> [&'static str; 2] {
    match sentiment {
        Sentiment::Positive => [
            "Thank you for your kind words! We're delighted you had a great experience.",
            "We appreciate you taking the time to share your positive feedback.",
        ],
        Sentiment::Negative => [
            "We're sorry to hear about your experience and appreciate you letting us know.",
            "Your feedback has been passed to our team so we can put things right.",
        ],
        Sentiment::Mixed => [
            "Thank you for your balanced feedback, it helps us see what is working and what isn't.",
            "We're glad some things went well and we're looking into the points you raised.",
        ],
        Sentiment::Unknown => [
            "Thank you for your feedback.",
            "We've received your message and will review it shortly.",
        ],
    }
}

fn emotion_templates(sentiment: Sentiment, emotion: &Emotion) -> &'static [&'static str] {
    match emotion {
        Emotion::Joy => &["It's great to hear you're happy with us!"],
        Emotion::Sadness => &["We understand this was disappointing and we want to make it right."],
        Emotion::Anger => &[
            "We understand your frustration and are treating this as a priority.",
            "A member of our support team will reach out to you directly.",
        ],
        Emotion::Fear => &[
            "We understand your concerns and want to reassure you.",
            "Please reach out if you'd like us to walk you through the details.",
        ],
        Emotion::Surprise => &["We're thrilled we could exceed your expectations!"],
        Emotion::Love => &[
            "We love having customers like you!",
            "Your enthusiasm means a lot to the whole team.",
        ],
        Emotion::Neutral if sentiment == Sentiment::Mixed => {
            &["We'd love to hear more about what we could do better."]
        }
        _ => &[],
    }
}

fn closing_line(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "We look forward to serving you again soon.",
        Sentiment::Negative => "Please contact our support team if there is anything else we can do.",
        Sentiment::Mixed => "Let us know if there's anything specific we should improve.",
        Sentiment::Unknown => "Feel free to share more details at any time.",
    }
}

/// Suggestions for a final sentiment and emotion
pub fn suggest(sentiment: Sentiment, emotion: &Emotion) -> Vec<String> {
    sentiment_templates(sentiment)
        .iter()
        .chain(emotion_templates(sentiment, emotion))
        .chain(std::iter::once(&closing_line(sentiment)))
        .take(MAX_SUGGESTIONS)
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_more_than_three() {
        let sentiments = [
            Sentiment::Positive,
            Sentiment::Negative,
            Sentiment::Mixed,
            Sentiment::Unknown,
        ];
        let emotions = [
            Emotion::Joy,
            Emotion::Sadness,
            Emotion::Anger,
            Emotion::Fear,
            Emotion::Surprise,
            Emotion::Love,
            Emotion::Neutral,
            Emotion::Other("optimism".to_string()),
        ];

        for sentiment in sentiments {
            for emotion in &emotions {
                let suggestions = suggest(sentiment, emotion);
                assert_eq!(suggestions.len(), MAX_SUGGESTIONS, "{sentiment} / {emotion}");
            }
        }
    }

    #[test]
    fn test_emotion_template_follows_sentiment_templates() {
        let suggestions = suggest(Sentiment::Negative, &Emotion::Anger);
        assert!(suggestions[0].starts_with("We're sorry"));
        assert!(suggestions[2].contains("frustration"));
    }

    #[test]
    fn test_closing_line_without_emotion_template() {
        let suggestions = suggest(Sentiment::Positive, &Emotion::Neutral);
        assert_eq!(suggestions[2], "We look forward to serving you again soon.");

        let mixed = suggest(Sentiment::Mixed, &Emotion::Neutral);
        assert!(mixed[2].contains("do better"));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(
            suggest(Sentiment::Mixed, &Emotion::Sadness),
            suggest(Sentiment::Mixed, &Emotion::Sadness)
        );
    }
}
