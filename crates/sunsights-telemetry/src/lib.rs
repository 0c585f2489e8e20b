//! Sunsights Telemetry
//!
//! Dashboard analytics and Prometheus metrics for Sunsights.
//!
//! Provides:
//! - A file-backed analytics store feeding the dashboard endpoints
//! - Metric names and recording helpers for the `metrics` facade

pub mod analytics;
pub mod metrics;
pub mod persistence;

pub use analytics::{
    Activity, ActivityKind, AnalyticsData, AnalyticsStore, ChartData, Dataset, Summary, TimeRange,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::analytics::{AnalyticsStore, ChartData, Summary, TimeRange};
    pub use crate::metrics::{describe_metrics, record_analysis, record_bulk_rows, record_request};
}
