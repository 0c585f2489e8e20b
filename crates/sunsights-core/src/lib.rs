//! Sunsights Core
//!
//! Core types and error handling shared across Sunsights components.
//!
//! This crate provides:
//! - Error types and result handling
//! - The classification vocabulary (sentiment, emotion, priority)
//! - The model output and analysis result records exchanged between crates

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{scale_score, AnalysisResult, Emotion, MlResult, Polarity, Priority, Sentiment};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{AnalysisResult, Emotion, MlResult, Polarity, Priority, Sentiment};
}
