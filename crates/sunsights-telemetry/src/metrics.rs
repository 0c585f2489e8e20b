//! Prometheus metric names and recording helpers
//!
//! Recording goes through the `metrics` facade, so these helpers are no-ops
//! until a recorder is installed by the binary.

use sunsights_core::AnalysisResult;

pub const REQUESTS_TOTAL: &str = "sunsights_requests_total";
pub const ANALYSES_TOTAL: &str = "sunsights_analyses_total";
pub const RULES_FIRED_TOTAL: &str = "sunsights_rules_fired_total";
pub const CLASSIFIER_FALLBACKS_TOTAL: &str = "sunsights_classifier_fallbacks_total";
pub const ANALYSIS_LATENCY_US: &str = "sunsights_analysis_latency_us";
pub const BULK_ROWS_TOTAL: &str = "sunsights_bulk_rows_total";

/// Register descriptions for every Sunsights metric
pub fn describe_metrics() {
    metrics::describe_counter!(REQUESTS_TOTAL, "Total number of API requests by endpoint");
    metrics::describe_counter!(
        ANALYSES_TOTAL,
        "Total number of classified texts by sentiment and priority"
    );
    metrics::describe_counter!(
        RULES_FIRED_TOTAL,
        "Total number of decisions by the rule that produced them"
    );
    metrics::describe_counter!(
        CLASSIFIER_FALLBACKS_TOTAL,
        "Total number of analyses that used the fixed classifier fallback"
    );
    metrics::describe_histogram!(
        ANALYSIS_LATENCY_US,
        metrics::Unit::Microseconds,
        "Single text analysis latency in microseconds"
    );
    metrics::describe_counter!(BULK_ROWS_TOTAL, "Bulk upload rows by outcome (valid, invalid)");
}

pub fn record_request(endpoint: &'static str) {
    metrics::counter!(REQUESTS_TOTAL, "endpoint" => endpoint).increment(1);
}

/// Record one classified text
pub fn record_analysis(
    result: &AnalysisResult,
    rule: Option<&'static str>,
    classifier_fallback: bool,
    latency_us: u64,
) {
    metrics::counter!(
        ANALYSES_TOTAL,
        "sentiment" => result.sentiment.as_str(),
        "priority" => result.priority.as_str()
    )
    .increment(1);

    metrics::counter!(RULES_FIRED_TOTAL, "rule" => rule.unwrap_or("input_guard")).increment(1);

    if classifier_fallback {
        metrics::counter!(CLASSIFIER_FALLBACKS_TOTAL).increment(1);
    }

    metrics::histogram!(ANALYSIS_LATENCY_US).record(latency_us as f64);
}

pub fn record_bulk_rows(valid: usize, invalid: usize) {
    metrics::counter!(BULK_ROWS_TOTAL, "outcome" => "valid").increment(valid as u64);
    metrics::counter!(BULK_ROWS_TOTAL, "outcome" => "invalid").increment(invalid as u64);
}
