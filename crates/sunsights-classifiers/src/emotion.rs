//! Lightweight emotion classifier (Tier A fallback)
//!
//! Keyword table over the six labels of the DistilBERT emotion model. The
//! label with the most hits wins; ties go to the earlier table entry.
//! Text without any hit is reported as `neutral`.

use crate::classifier::{ClassificationMetadata, ClassificationResult, Classifier, ClassifierTier};
use aho_corasick::AhoCorasick;
use std::time::Instant;
use sunsights_core::Result;

/// (label, keywords)
const EMOTION_TABLE: &[(&str, &[&str])] = &[
    (
        "anger",
        &[
            "angry",
            "furious",
            "hate",
            "annoyed",
            "frustrated",
            "ridiculous",
            "unacceptable",
            "outraged",
            "worst",
            "rude",
        ],
    ),
    (
        "fear",
        &[
            "worried", "worry", "afraid", "scared", "nervous", "anxious", "fear", "unsafe",
        ],
    ),
    (
        "sadness",
        &[
            "sad",
            "disappointed",
            "disappointing",
            "unhappy",
            "regret",
            "let down",
            "miss",
            "sorry",
            "lonely",
        ],
    ),
    (
        "surprise",
        &[
            "wow",
            "surprised",
            "unexpected",
            "incredible",
            "unbelievable",
            "shocked",
            "astonishing",
        ],
    ),
    (
        "love",
        &["love", "adore", "favorite", "favourite", "obsessed", "best ever"],
    ),
    (
        "joy",
        &[
            "happy",
            "glad",
            "great",
            "good",
            "excellent",
            "enjoy",
            "pleased",
            "delighted",
            "wonderful",
            "fantastic",
            "thank",
        ],
    ),
];

pub struct LexiconEmotionClassifier {
    name: String,
    matcher: AhoCorasick,
    /// Table index for every automaton pattern
    pattern_labels: Vec<usize>,
}

impl LexiconEmotionClassifier {
    pub fn new() -> Result<Self> {
        let (pattern_labels, keywords): (Vec<usize>, Vec<&str>) = EMOTION_TABLE
            .iter()
            .enumerate()
            .flat_map(|(idx, (_, words))| words.iter().map(move |word| (idx, *word)))
            .unzip();

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&keywords)
            .map_err(|e| {
                sunsights_core::Error::classifier(format!("Failed to build emotion matcher: {e}"))
            })?;

        Ok(Self {
            name: "emotion-lexicon".to_string(),
            matcher,
            pattern_labels,
        })
    }
}

#[async_trait::async_trait]
impl Classifier for LexiconEmotionClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();

        let mut hits = vec![0u32; EMOTION_TABLE.len()];
        for m in self.matcher.find_iter(text) {
            hits[self.pattern_labels[m.pattern().as_usize()]] += 1;
        }

        let total: u32 = hits.iter().sum();
        let mut best = 0;
        for (idx, count) in hits.iter().enumerate() {
            if *count > hits[best] {
                best = idx;
            }
        }

        let (label, score) = if total == 0 {
            ("neutral", 0.0)
        } else {
            (EMOTION_TABLE[best].0, hits[best] as f32 / total as f32)
        };

        let all_scores = if total == 0 {
            None
        } else {
            Some(
                EMOTION_TABLE
                    .iter()
                    .zip(&hits)
                    .map(|((label, _), count)| (label.to_string(), *count as f32 / total as f32))
                    .collect(),
            )
        };

        Ok(ClassificationResult {
            label: label.to_string(),
            score,
            metadata: ClassificationMetadata {
                model: Some(self.name.clone()),
                all_scores,
            },
            latency_us: start.elapsed().as_micros() as u64,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn tier(&self) -> ClassifierTier {
        ClassifierTier::A
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dominant_emotion() {
        let classifier = LexiconEmotionClassifier::new().unwrap();

        let result = classifier
            .classify("I'm furious, the courier was rude and I hate waiting")
            .await
            .unwrap();
        assert_eq!(result.label, "anger");
        assert_eq!(result.score, 1.0);
    }

    #[tokio::test]
    async fn test_neutral_without_hits() {
        let classifier = LexiconEmotionClassifier::new().unwrap();

        let result = classifier.classify("Order number 4471").await.unwrap();
        assert_eq!(result.label, "neutral");
        assert!(result.metadata.all_scores.is_none());
    }

    #[tokio::test]
    async fn test_scores_sum_to_one() {
        let classifier = LexiconEmotionClassifier::new().unwrap();

        let result = classifier
            .classify("Wow, I love it but I'm a bit worried about the battery")
            .await
            .unwrap();
        let total: f32 = result
            .metadata
            .all_scores
            .unwrap()
            .iter()
            .map(|(_, s)| s)
            .sum();
        assert!((total - 1.0).abs() < 1e-5);
    }
}
