//! Sunsights Policy Engine
//!
//! Turns pattern flags and model output into a final classification:
//! - an ordered, first-match-wins decision table (sentiment, score, emotion)
//! - priority derivation with the concern and functionality overrides
//! - a fixed catalog of response suggestions

pub mod engine;
pub mod priority;
pub mod rule;
pub mod suggestions;

pub use engine::{Evaluation, SentimentAnalyzer, BULK_CONCURRENCY};
pub use priority::{base_priority, derive_priority};
pub use rule::{evaluate, DecisionContext, DecisionRule, RuleId, Verdict, DECISION_TABLE};
pub use suggestions::{suggest, CLARIFICATION, MAX_SUGGESTIONS};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::engine::{Evaluation, SentimentAnalyzer};
    pub use crate::rule::RuleId;
}
