//! Phrase-list pattern matcher (Tier A)
//!
//! Scans normalized feedback text for curated phrase sets and reports one
//! boolean per category. Matching is plain substring containment with no
//! word boundaries ("bad" also fires inside "badly"); only the negation
//! markers are matched as whole word tokens.

use aho_corasick::AhoCorasick;
use regex::Regex;
use serde::Serialize;
use sunsights_core::Result;

pub const NEGATIVE: &[&str] = &[
    "not good",
    "not great",
    "bad",
    "terrible",
    "awful",
    "poor",
    "horrible",
    "disappointing",
    "worse",
    "worst",
    "could be better",
    "needs improvement",
    "should improve",
    "not happy",
    "not satisfied",
    "dislike",
    "hate",
    "frustrated",
    "annoyed",
    "angry",
    "upset",
    "sad",
    "unhappy",
];

pub const POSITIVE: &[&str] = &[
    "good",
    "great",
    "excellent",
    "amazing",
    "wonderful",
    "fantastic",
    "outstanding",
    "exceptional",
    "perfect",
    "brilliant",
    "superb",
    "happy",
    "glad",
    "pleased",
    "delighted",
    "satisfied",
    "enjoy",
    "love",
    "like",
    "appreciate",
];

pub const DOUBLE_NEGATIVE: &[&str] = &[
    "not bad",
    "isn't bad",
    "aren't bad",
    "wasn't bad",
    "weren't bad",
    "not terrible",
    "isn't terrible",
    "not awful",
    "isn't awful",
    "not the worst",
    "isn't the worst",
];

pub const ANGER: &[&str] = &[
    "furious",
    "angry",
    "mad",
    "outraged",
    "terrible service",
    "awful service",
    "horrible service",
    "unacceptable",
    "ridiculous",
    "infuriating",
    "frustrated",
    "annoyed",
    "irritated",
    "upset",
    "appalling",
    "terrible",
    "horrible",
    "awful",
    "worst",
    "hate",
    "disgusting",
    "pathetic",
    "useless",
    "waste",
    "poor service",
    "bad service",
    "poor quality",
    "bad quality",
    "complaint",
    "complain",
    "unsatisfied",
    "dissatisfied",
    "not happy",
    "unhappy",
    "never again",
    "never use",
    "never buy",
    "never shop",
    "never return",
    "never recommend",
];

pub const SADNESS: &[&str] = &[
    "disappointed",
    "disappointing",
    "disappointment",
    "sad",
    "unhappy",
    "regret",
    "let down",
    "letdown",
    "not as expected",
    "not what i expected",
    "dissatisfied",
    "unsatisfied",
];

pub const LOVE: &[&str] = &[
    "adore",
    "love",
    "can't live without",
    "obsessed with",
    "favorite",
    "best ever",
    "absolutely love",
    "absolutely adore",
];

pub const SURPRISE: &[&str] = &[
    "wow",
    "didn't expect",
    "unexpected",
    "surprised",
    "amazing results",
    "can't believe",
    "incredible",
    "unbelievable",
    "astonishing",
];

pub const FUNCTIONALITY_ISSUE: &[&str] = &[
    "doesn't work",
    "does not work",
    "not working",
    "broken",
    "malfunction",
    "error",
    "bug",
    "glitch",
    "crash",
    "freezes",
    "hangs",
    "stuck",
    "failed",
    "failure",
    "unusable",
    "can't use",
    "cannot use",
    "not as advertised",
    "false advertising",
    "misleading",
    "misrepresented",
    "not as described",
    "not what i expected",
    "not what was promised",
    "promised",
    "advertised",
];

pub const MIXED_CUES: &[&str] = &[
    "mixed feelings",
    "pros and cons",
    "good and bad",
    "like and dislike",
    "partly",
    "somewhat",
    "kind of",
    "sort of",
    "not sure if",
    "conflicted",
    "on one hand",
    "on the other hand",
    "however",
    "although",
    "but",
    "nevertheless",
    "nonetheless",
    "despite",
    "in spite of",
    "while",
    "whereas",
    "concerned",
    "concern",
    "worried",
    "worry",
    "issue",
    "issues",
    "problem",
    "problems",
    "drawback",
    "drawbacks",
    "downside",
    "downsides",
];

pub const NEGATION_TOKENS: &[&str] = &[
    "not", "no", "don't", "doesn't", "didn't", "won't", "wouldn't", "couldn't", "isn't", "aren't",
];

/// True if any phrase occurs as a substring of `text`
pub fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| text.contains(phrase))
}

/// Per-category detections for one piece of text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PatternFlags {
    pub has_negative: bool,
    pub has_positive: bool,
    pub has_double_negative: bool,
    pub has_surprise_phrase: bool,
    pub is_anger_expression: bool,
    pub is_sadness_expression: bool,
    pub is_love_expression: bool,
    pub is_surprise_expression: bool,
    pub is_mixed_sentiment: bool,
    pub has_functionality_issue: bool,
    pub has_negation: bool,
    pub has_but: bool,
}

impl PatternFlags {
    /// Names of the flags that are set, for logging
    pub fn active(&self) -> Vec<&'static str> {
        [
            ("negative", self.has_negative),
            ("positive", self.has_positive),
            ("double_negative", self.has_double_negative),
            ("surprise_phrase", self.has_surprise_phrase),
            ("anger", self.is_anger_expression),
            ("sadness", self.is_sadness_expression),
            ("love", self.is_love_expression),
            ("surprise", self.is_surprise_expression),
            ("mixed", self.is_mixed_sentiment),
            ("functionality_issue", self.has_functionality_issue),
            ("negation", self.has_negation),
            ("but", self.has_but),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

/// Fast phrase matcher using one Aho-Corasick automaton per category
pub struct PatternMatcher {
    negative: AhoCorasick,
    positive: AhoCorasick,
    double_negative: AhoCorasick,
    anger: AhoCorasick,
    sadness: AhoCorasick,
    love: AhoCorasick,
    surprise: AhoCorasick,
    functionality: AhoCorasick,
    mixed: AhoCorasick,
    word: Regex,
}

impl PatternMatcher {
    /// Compile the built-in phrase lists
    pub fn new() -> Result<Self> {
        let word = Regex::new(r"[a-z0-9']+").map_err(|e| {
            sunsights_core::Error::classifier(format!("Failed to build word tokenizer: {e}"))
        })?;

        Ok(Self {
            negative: build("negative", NEGATIVE)?,
            positive: build("positive", POSITIVE)?,
            double_negative: build("double-negative", DOUBLE_NEGATIVE)?,
            anger: build("anger", ANGER)?,
            sadness: build("sadness", SADNESS)?,
            love: build("love", LOVE)?,
            surprise: build("surprise", SURPRISE)?,
            functionality: build("functionality", FUNCTIONALITY_ISSUE)?,
            mixed: build("mixed", MIXED_CUES)?,
            word,
        })
    }

    /// Detect all categories in `text`.
    ///
    /// `text` must already be lower-cased and trimmed.
    pub fn detect(&self, text: &str) -> PatternFlags {
        let has_negative = self.negative.is_match(text);
        let has_positive = self.positive.is_match(text);
        let has_surprise_phrase = self.surprise.is_match(text);

        PatternFlags {
            has_negative,
            has_positive,
            has_double_negative: self.double_negative.is_match(text),
            has_surprise_phrase,
            is_anger_expression: self.anger.is_match(text) || (text.contains('!') && has_negative),
            is_sadness_expression: self.sadness.is_match(text),
            is_love_expression: self.love.is_match(text),
            is_surprise_expression: has_surprise_phrase,
            is_mixed_sentiment: self.mixed.is_match(text) || (has_positive && has_negative),
            has_functionality_issue: self.functionality.is_match(text),
            has_negation: self
                .word
                .find_iter(text)
                .any(|token| NEGATION_TOKENS.contains(&token.as_str())),
            has_but: text.contains("but"),
        }
    }
}

fn build(category: &str, patterns: &[&str]) -> Result<AhoCorasick> {
    AhoCorasick::new(patterns).map_err(|e| {
        sunsights_core::Error::classifier(format!("Failed to build {category} matcher: {e}"))
    })
}
