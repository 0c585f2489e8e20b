//! HTTP routes and handlers

use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, DefaultBodyLimit, Multipart,
        Query, State,
    },
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use sunsights_core::{Emotion, Error, Priority, Sentiment};
use sunsights_telemetry::{metrics as telemetry, Activity, ChartData, Summary, TimeRange};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::bulk::{self, BulkReport, MAX_INVALID_EXAMPLES};
use crate::ingest::{self, FileKind};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let analytics_routes = Router::new()
        .route("/test", get(analytics_test))
        .route("/analyze", post(analyze))
        .route("/analyze-bulk", post(analyze_bulk))
        .route("/summary", get(summary))
        .route("/activity", get(activity))
        .route("/sentiment", get(sentiment_chart))
        .route("/emotions", get(emotion_chart))
        .route("/priority", get(priority_chart));

    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .nest("/api/analytics", analytics_routes)
        .fallback(fallback)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(state.config.max_upload_bytes))
        .layer(cors_layer(&state.config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn welcome() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to the Sunsights API!" }))
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

async fn analytics_test() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "message": "Analytics API is working" }))
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    text: String,
}

#[derive(Debug, Serialize)]
struct AnalyzeResponse {
    success: bool,
    analysis: AnalysisView,
    suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
struct AnalysisView {
    text: String,
    sentiment: Sentiment,
    sentiment_score: u8,
    emotion: Emotion,
    priority: Priority,
}

async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    telemetry::record_request("analyze");

    let Json(req) = payload.map_err(|e| {
        debug!(error = %e, "Rejected analyze request");
        AppError::InvalidRequest("No text provided".to_string())
    })?;
    let text = req.text.trim().to_string();

    let started = Instant::now();
    let evaluation = state.analyzer.evaluate(&text).await;
    let latency_us = started.elapsed().as_micros() as u64;

    let result = evaluation.result;
    telemetry::record_analysis(
        &result,
        evaluation.rule.map(|rule| rule.as_str()),
        evaluation.classifier_fallback,
        latency_us,
    );
    state.analytics.record_analysis(&result);

    info!(
        sentiment = %result.sentiment,
        emotion = %result.emotion,
        priority = %result.priority,
        latency_us,
        "Text analysis completed"
    );

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis: AnalysisView {
            text,
            sentiment: result.sentiment,
            sentiment_score: result.sentiment_score,
            emotion: result.emotion,
            priority: result.priority,
        },
        suggestions: result.response_suggestions,
    }))
}

async fn analyze_bulk(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<BulkReport>, AppError> {
    telemetry::record_request("analyze_bulk");

    let mut multipart = multipart.map_err(|_| AppError::InvalidRequest("No file part".to_string()))?;

    let (file_name, bytes) = loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| AppError::InvalidRequest(format!("Failed to read file: {e}")))?
            .ok_or_else(|| AppError::InvalidRequest("No file part".to_string()))?;

        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(AppError::InvalidRequest("No selected file".to_string()));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidRequest(format!("Failed to read file: {e}")))?;
        break (file_name, bytes);
    };

    let kind = FileKind::from_file_name(&file_name).ok_or_else(|| {
        AppError::InvalidRequest("File type not allowed. Please upload CSV or Excel file".to_string())
    })?;
    info!(file = %file_name, bytes = bytes.len(), "Received file for bulk analysis");

    let table = tokio::task::spawn_blocking(move || ingest::read_table(kind, &bytes))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| {
            let message = format!("Failed to read file: {}", ingest_message(e));
            state.analytics.record_error("Bulk Analysis Error", &message);
            AppError::InvalidRequest(message)
        })?;

    let column = ingest::comment_column(&table.headers).ok_or_else(|| {
        AppError::InvalidRequest("No valid comment column found in the file".to_string())
    })?;
    let comments = table.column(column);
    if comments.is_empty() {
        return Err(AppError::InvalidRequest("No comments found in the file".to_string()));
    }
    info!(file = %file_name, comments = comments.len(), "Processing comments");

    let results = state.analyzer.analyze_many(&comments).await;
    let outcome = bulk::summarize(&comments, results);
    let report = outcome.report;

    telemetry::record_bulk_rows(report.valid_comments, report.invalid_comments);

    if report.valid_comments == 0 {
        return Err(AppError::NoValidComments {
            invalid_examples: report.invalid_examples,
        });
    }

    state.analytics.record_bulk(&file_name, &outcome.valid);

    info!(
        file = %file_name,
        valid = report.valid_comments,
        invalid = report.invalid_comments,
        "Bulk analysis completed"
    );

    Ok(Json(report))
}

fn ingest_message(error: Error) -> String {
    match error {
        Error::Ingest(message) => message,
        other => other.to_string(),
    }
}

async fn summary(State(state): State<AppState>) -> Json<Summary> {
    Json(state.analytics.summary())
}

async fn activity(State(state): State<AppState>) -> Json<Vec<Activity>> {
    Json(state.analytics.activities())
}

#[derive(Debug, Deserialize)]
struct SentimentQuery {
    #[serde(rename = "timeRange")]
    time_range: Option<String>,
}

async fn sentiment_chart(
    State(state): State<AppState>,
    Query(query): Query<SentimentQuery>,
) -> Json<ChartData> {
    let range = query
        .time_range
        .as_deref()
        .map(TimeRange::from_query)
        .unwrap_or_default();
    Json(state.analytics.sentiment_chart(range))
}

async fn emotion_chart(State(state): State<AppState>) -> Json<ChartData> {
    Json(state.analytics.emotion_chart())
}

async fn priority_chart(State(state): State<AppState>) -> Json<ChartData> {
    Json(state.analytics.priority_chart())
}

async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Error handling
#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    NoValidComments { invalid_examples: Vec<String> },
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            AppError::NoValidComments { mut invalid_examples } => {
                invalid_examples.truncate(MAX_INVALID_EXAMPLES);
                let body = json!({
                    "error": "No valid comments for sentiment analysis found in the file",
                    "details": "The file appears to contain irrelevant content that cannot be analyzed for sentiment.",
                    "invalid_examples": invalid_examples,
                });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            AppError::Internal(message) => {
                let body = json!({ "error": "Analysis failed", "message": message });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
