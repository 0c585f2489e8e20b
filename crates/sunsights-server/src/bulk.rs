//! Bulk upload report

use serde::Serialize;
use std::collections::HashMap;
use sunsights_core::{AnalysisResult, Emotion, Priority, Sentiment};

/// Characters of an invalid comment echoed back
pub const MAX_EXAMPLE_CHARS: usize = 100;

/// Invalid comments echoed back
pub const MAX_INVALID_EXAMPLES: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleResult {
    pub text: String,
    pub sentiment: Sentiment,
    pub emotion: Emotion,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkReport {
    pub total_comments: usize,
    pub valid_comments: usize,
    pub invalid_comments: usize,

    /// Mean 0-100 score of valid comments, as `"NN%"`
    pub average_sentiment: String,

    pub priority_distribution: PriorityDistribution,
    pub invalid_examples: Vec<String>,

    /// One result per emotion/priority group first, then the rest
    pub sample_results: Vec<SampleResult>,
}

/// Report plus the valid results, for analytics
#[derive(Debug)]
pub struct BulkOutcome {
    pub report: BulkReport,
    pub valid: Vec<AnalysisResult>,
}

fn example(comment: &str) -> String {
    if comment.chars().count() > MAX_EXAMPLE_CHARS {
        let head: String = comment.chars().take(MAX_EXAMPLE_CHARS).collect();
        format!("{head}...")
    } else {
        comment.to_string()
    }
}

/// Build the report for `comments` and their analysis results.
///
/// Missing and `UNKNOWN` results count as invalid.
pub fn summarize(comments: &[String], results: Vec<Option<AnalysisResult>>) -> BulkOutcome {
    let mut valid = Vec::new();
    let mut valid_texts = Vec::new();
    let mut invalid = Vec::new();

    for (comment, result) in comments.iter().zip(results) {
        match result {
            Some(result) if !result.is_unknown() => {
                valid_texts.push(comment.as_str());
                valid.push(result);
            }
            _ => invalid.push(example(comment)),
        }
    }

    let mut distribution = PriorityDistribution::default();
    for result in &valid {
        match result.priority {
            Priority::High => distribution.high += 1,
            Priority::Medium => distribution.medium += 1,
            Priority::Low => distribution.low += 1,
        }
    }

    let average = if valid.is_empty() {
        0
    } else {
        let total: u64 = valid.iter().map(|r| u64::from(r.sentiment_score)).sum();
        (total as f64 / valid.len() as f64).round() as u64
    };

    let invalid_comments = invalid.len();
    invalid.truncate(MAX_INVALID_EXAMPLES);

    let report = BulkReport {
        total_comments: comments.len(),
        valid_comments: valid.len(),
        invalid_comments,
        average_sentiment: format!("{average}%"),
        priority_distribution: distribution,
        invalid_examples: invalid,
        sample_results: sample(&valid_texts, &valid),
    };

    BulkOutcome { report, valid }
}

fn sample(texts: &[&str], results: &[AnalysisResult]) -> Vec<SampleResult> {
    let mut groups: Vec<Vec<SampleResult>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (text, result) in texts.iter().zip(results) {
        let key = format!("{}_{}", result.emotion, result.priority);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(SampleResult {
            text: text.to_string(),
            sentiment: result.sentiment,
            emotion: result.emotion.clone(),
            priority: result.priority,
        });
    }

    let mut samples = Vec::with_capacity(results.len());
    let mut rest = Vec::new();
    for mut group in groups {
        let tail = group.split_off(1);
        samples.extend(group);
        rest.extend(tail);
    }
    samples.extend(rest);
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(sentiment: Sentiment, score: u8, emotion: Emotion, priority: Priority) -> Option<AnalysisResult> {
        Some(AnalysisResult {
            sentiment,
            sentiment_score: score,
            emotion,
            priority,
            response_suggestions: Vec::new(),
        })
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_counts_and_average() {
        let comments = texts(&["great", "awful", "   ", "123"]);
        let results = vec![
            result(Sentiment::Positive, 90, Emotion::Joy, Priority::Low),
            result(Sentiment::Negative, 61, Emotion::Anger, Priority::High),
            None,
            Some(AnalysisResult::unknown(Vec::new())),
        ];

        let outcome = summarize(&comments, results);
        let report = &outcome.report;
        assert_eq!(report.total_comments, 4);
        assert_eq!(report.valid_comments, 2);
        assert_eq!(report.invalid_comments, 2);
        assert_eq!(report.average_sentiment, "76%");
        assert_eq!(report.priority_distribution.high, 1);
        assert_eq!(report.priority_distribution.low, 1);
        assert_eq!(report.invalid_examples, vec!["   ".to_string(), "123".to_string()]);
        assert_eq!(outcome.valid.len(), 2);
    }

    #[test]
    fn test_samples_lead_with_one_per_group() {
        let comments = texts(&["a", "b", "c", "d"]);
        let results = vec![
            result(Sentiment::Positive, 90, Emotion::Joy, Priority::Low),
            result(Sentiment::Positive, 80, Emotion::Joy, Priority::Low),
            result(Sentiment::Negative, 90, Emotion::Anger, Priority::High),
            result(Sentiment::Positive, 85, Emotion::Joy, Priority::Low),
        ];

        let report = summarize(&comments, results).report;
        let order: Vec<_> = report.sample_results.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn test_invalid_examples_truncated_and_capped() {
        let long = "x".repeat(150);
        let comments: Vec<String> = (0..7).map(|_| long.clone()).collect();
        let results = vec![None; 7];

        let report = summarize(&comments, results).report;
        assert_eq!(report.invalid_comments, 7);
        assert_eq!(report.invalid_examples.len(), MAX_INVALID_EXAMPLES);
        assert_eq!(report.invalid_examples[0].len(), MAX_EXAMPLE_CHARS + 3);
        assert_eq!(report.average_sentiment, "0%");
        assert!(report.sample_results.is_empty());
    }

    #[test]
    fn test_sample_serializes_wire_labels() {
        let report = summarize(
            &texts(&["meh"]),
            vec![result(Sentiment::Mixed, 45, Emotion::Neutral, Priority::Medium)],
        )
        .report;

        let json = serde_json::to_value(&report.sample_results[0]).unwrap();
        assert_eq!(json["sentiment"], "MIXED");
        assert_eq!(json["emotion"], "neutral");
        assert_eq!(json["priority"], "Medium");
    }
}
