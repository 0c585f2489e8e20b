//! Dashboard analytics
//!
//! [`AnalyticsStore`] accumulates counters for every analysed text and keeps
//! a short activity feed. Chart payloads are built from the recorded counts
//! only; days or labels without data report zero.

use crate::persistence;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use sunsights_core::{AnalysisResult, Emotion, Priority, Sentiment};
use tracing::{info, warn};

/// Activities kept in the feed
pub const MAX_ACTIVITIES: usize = 10;

/// Days of per-day sentiment counts kept
pub const RETENTION_DAYS: i64 = 90;

/// Characters of an error message kept in its activity
pub const ERROR_DESCRIPTION_CHARS: usize = 50;

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Info,
    Success,
    Error,
}

/// One entry of the activity feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub title: String,
    pub description: String,
    pub time: String,

    #[serde(rename = "type")]
    pub kind: ActivityKind,
}

impl Activity {
    fn new(title: impl Into<String>, description: impl Into<String>, kind: ActivityKind, now: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            time: now.format(TIME_FORMAT).to_string(),
            kind,
        }
    }

    fn welcome(now: NaiveDateTime) -> Self {
        Self::new(
            "Welcome to Sunsights",
            "Your sentiment analysis dashboard is ready",
            ActivityKind::Info,
            now,
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl PriorityCounts {
    fn add(&mut self, priority: Priority) {
        match priority {
            Priority::High => self.high += 1,
            Priority::Medium => self.medium += 1,
            Priority::Low => self.low += 1,
        }
    }
}

/// Sentiment counts for one calendar day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySentiment {
    pub positive: u64,
    pub negative: u64,
    pub mixed: u64,
}

impl DailySentiment {
    fn add(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Mixed => self.mixed += 1,
            Sentiment::Unknown => {}
        }
    }

    fn total(&self) -> u64 {
        self.positive + self.negative + self.mixed
    }

    fn percent(&self, count: u64) -> u64 {
        match self.total() {
            0 => 0,
            total => ((count as f64 * 100.0) / total as f64).round() as u64,
        }
    }
}

/// Persisted analytics document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsData {
    pub total_analyses: u64,
    pub bulk_uploads: u64,

    /// Running mean of 0-100 scores over scored analyses
    pub average_sentiment: f64,

    pub last_analysis_time: Option<String>,

    /// Newest first
    pub activities: Vec<Activity>,

    /// Analyses that produced a known sentiment
    pub scored_analyses: u64,

    /// Keyed by lower-case emotion label
    pub emotion_counts: BTreeMap<String, u64>,

    pub priority_counts: PriorityCounts,

    /// Keyed by `%Y-%m-%d`
    pub daily_sentiment: BTreeMap<String, DailySentiment>,
}

impl AnalyticsData {
    fn seeded(now: NaiveDateTime) -> Self {
        Self {
            activities: vec![Activity::welcome(now)],
            ..Default::default()
        }
    }

    fn push_activity(&mut self, activity: Activity) {
        self.activities.insert(0, activity);
        self.activities.truncate(MAX_ACTIVITIES);
    }

    fn count_result(&mut self, result: &AnalysisResult, today: NaiveDate) {
        self.total_analyses += 1;

        if result.is_unknown() {
            return;
        }

        let n = self.scored_analyses as f64;
        self.average_sentiment =
            (self.average_sentiment * n + f64::from(result.sentiment_score)) / (n + 1.0);
        self.scored_analyses += 1;

        *self
            .emotion_counts
            .entry(result.emotion.as_str().to_lowercase())
            .or_insert(0) += 1;
        self.priority_counts.add(result.priority);
        self.daily_sentiment
            .entry(today.format(DATE_FORMAT).to_string())
            .or_default()
            .add(result.sentiment);
    }

    fn prune(&mut self, today: NaiveDate) {
        let cutoff = (today - Duration::days(RETENTION_DAYS))
            .format(DATE_FORMAT)
            .to_string();
        self.daily_sentiment.retain(|day, _| *day >= cutoff);
    }
}

/// Dashboard summary counters
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_analyses: u64,
    pub bulk_uploads: u64,
    pub average_sentiment: u64,
    pub last_analysis_time: Option<String>,
}

/// Window of the sentiment trend chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    Day,
    #[default]
    Week,
    Month,
    Quarter,
}

impl TimeRange {
    /// Parse a `timeRange` query value; unknown values select a week
    pub fn from_query(value: &str) -> Self {
        match value {
            "24h" => TimeRange::Day,
            "30d" => TimeRange::Month,
            "90d" => TimeRange::Quarter,
            _ => TimeRange::Week,
        }
    }

    pub fn days(self) -> i64 {
        match self {
            TimeRange::Day => 1,
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Quarter => 90,
        }
    }

    /// Every date from `days` ago through `today`, inclusive
    pub fn dates(self, today: NaiveDate) -> Vec<NaiveDate> {
        let days = self.days();
        (0..=days).map(|i| today - Duration::days(days - i)).collect()
    }
}

/// Chart.js style payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Colors {
    One(&'static str),
    Each(Vec<&'static str>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    pub data: Vec<u64>,

    pub background_color: Colors,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f32>,
}

impl Dataset {
    fn bars(label: &str, data: Vec<u64>, color: &'static str) -> Self {
        Self {
            label: Some(label.to_string()),
            data,
            background_color: Colors::One(color),
            border_color: None,
            border_width: None,
            fill: None,
            tension: None,
        }
    }

    fn trend(label: &str, data: Vec<u64>, line: &'static str, area: &'static str) -> Self {
        Self {
            label: Some(label.to_string()),
            data,
            background_color: Colors::One(area),
            border_color: Some(line),
            border_width: None,
            fill: Some(true),
            tension: Some(0.4),
        }
    }
}

const CHART_EMOTIONS: [(Emotion, &str); 7] = [
    (Emotion::Joy, "#FCD34D"),
    (Emotion::Sadness, "#60A5FA"),
    (Emotion::Anger, "#F87171"),
    (Emotion::Fear, "#818CF8"),
    (Emotion::Surprise, "#34D399"),
    (Emotion::Love, "#F472B6"),
    (Emotion::Neutral, "#9CA3AF"),
];

fn chart_label(emotion: &Emotion) -> String {
    let label = emotion.as_str();
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate_description(message: &str) -> String {
    if message.chars().count() > ERROR_DESCRIPTION_CHARS {
        let head: String = message.chars().take(ERROR_DESCRIPTION_CHARS).collect();
        format!("{head}...")
    } else {
        message.to_string()
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Thread-safe analytics store, optionally backed by a JSON file.
///
/// Every mutation is written through to disk from a snapshot taken after
/// the data lock is released, so readers never wait on file I/O.
/// Persistence failures are logged and never surfaced to callers.
pub struct AnalyticsStore {
    path: Option<PathBuf>,
    data: RwLock<AnalyticsData>,
    /// Bumped under the data write lock on every mutation
    revision: AtomicU64,
    /// Revision of the document last written to `path`
    persisted: Mutex<u64>,
}

impl AnalyticsStore {
    /// Store that is never persisted
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: RwLock::new(AnalyticsData::seeded(now())),
            revision: AtomicU64::new(0),
            persisted: Mutex::new(0),
        }
    }

    /// Load the document at `path`, seeding a new one if it is missing or unreadable
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let data = match persistence::load(&path) {
            Ok(Some(data)) => {
                info!(
                    path = %path.display(),
                    total_analyses = data.total_analyses,
                    "Analytics data loaded"
                );
                data
            }
            Ok(None) => {
                let data = AnalyticsData::seeded(now());
                if let Err(e) = persistence::save(&path, &data) {
                    warn!(path = %path.display(), error = %e, "Failed to create analytics data file");
                }
                data
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load analytics data, starting fresh");
                AnalyticsData::seeded(now())
            }
        };

        Self {
            path: Some(path),
            data: RwLock::new(data),
            revision: AtomicU64::new(0),
            persisted: Mutex::new(0),
        }
    }

    /// Copy of the current document
    pub fn snapshot(&self) -> AnalyticsData {
        self.data.read().clone()
    }

    /// Count a single-text analysis
    pub fn record_analysis(&self, result: &AnalysisResult) {
        self.record_analysis_at(result, now());
    }

    pub fn record_analysis_at(&self, result: &AnalysisResult, now: NaiveDateTime) {
        self.mutate(|data| {
            data.count_result(result, now.date());
            data.last_analysis_time = Some(now.format(TIME_FORMAT).to_string());
            data.push_activity(Activity::new(
                "Text Analysis Completed",
                format!("Sentiment: {}, Emotion: {}", result.sentiment, result.emotion),
                ActivityKind::Success,
                now,
            ));
            data.prune(now.date());
        });
    }

    /// Count the valid results of one bulk upload
    pub fn record_bulk(&self, file_name: &str, results: &[AnalysisResult]) {
        self.record_bulk_at(file_name, results, now());
    }

    pub fn record_bulk_at(&self, file_name: &str, results: &[AnalysisResult], now: NaiveDateTime) {
        self.mutate(|data| {
            for result in results {
                data.count_result(result, now.date());
            }
            data.bulk_uploads += 1;
            data.last_analysis_time = Some(now.format(TIME_FORMAT).to_string());
            data.push_activity(Activity::new(
                "Bulk Analysis Completed",
                format!("Processed {} valid comments from {}", results.len(), file_name),
                ActivityKind::Success,
                now,
            ));
            data.prune(now.date());
        });
    }

    /// Append an error activity
    pub fn record_error(&self, title: &str, message: &str) {
        self.record_error_at(title, message, now());
    }

    pub fn record_error_at(&self, title: &str, message: &str, now: NaiveDateTime) {
        self.mutate(|data| {
            data.push_activity(Activity::new(
                title,
                truncate_description(message),
                ActivityKind::Error,
                now,
            ));
        });
    }

    pub fn summary(&self) -> Summary {
        let data = self.data.read();
        Summary {
            total_analyses: data.total_analyses,
            bulk_uploads: data.bulk_uploads,
            average_sentiment: data.average_sentiment.round() as u64,
            last_analysis_time: data.last_analysis_time.clone(),
        }
    }

    /// Most recent activities, newest first
    pub fn activities(&self) -> Vec<Activity> {
        self.data
            .read()
            .activities
            .iter()
            .take(MAX_ACTIVITIES)
            .cloned()
            .collect()
    }

    pub fn emotion_chart(&self) -> ChartData {
        let data = self.data.read();

        let (labels, counts): (Vec<_>, Vec<_>) = CHART_EMOTIONS
            .iter()
            .map(|(emotion, _)| {
                let count = data.emotion_counts.get(emotion.as_str()).copied().unwrap_or(0);
                (chart_label(emotion), count)
            })
            .unzip();

        ChartData {
            labels,
            datasets: vec![Dataset {
                label: None,
                data: counts,
                background_color: Colors::Each(CHART_EMOTIONS.iter().map(|(_, c)| *c).collect()),
                border_color: None,
                border_width: Some(0),
                fill: None,
                tension: None,
            }],
        }
    }

    pub fn priority_chart(&self) -> ChartData {
        let counts = self.data.read().priority_counts;

        ChartData {
            labels: vec!["All Time".to_string()],
            datasets: vec![
                Dataset::bars("High Priority", vec![counts.high], "#F87171"),
                Dataset::bars("Medium Priority", vec![counts.medium], "#FBBF24"),
                Dataset::bars("Low Priority", vec![counts.low], "#34D399"),
            ],
        }
    }

    /// Per-day positive and negative percentages over `range`
    pub fn sentiment_chart(&self, range: TimeRange) -> ChartData {
        self.sentiment_chart_at(range, now().date())
    }

    pub fn sentiment_chart_at(&self, range: TimeRange, today: NaiveDate) -> ChartData {
        let data = self.data.read();

        let mut labels = Vec::new();
        let mut positive = Vec::new();
        let mut negative = Vec::new();

        for date in range.dates(today) {
            let key = date.format(DATE_FORMAT).to_string();
            let day = data.daily_sentiment.get(&key).copied().unwrap_or_default();
            positive.push(day.percent(day.positive));
            negative.push(day.percent(day.negative));
            labels.push(key);
        }

        ChartData {
            labels,
            datasets: vec![
                Dataset::trend("Positive", positive, "#34D399", "rgba(52, 211, 153, 0.1)"),
                Dataset::trend("Negative", negative, "#F87171", "rgba(248, 113, 113, 0.1)"),
            ],
        }
    }

    fn mutate(&self, f: impl FnOnce(&mut AnalyticsData)) {
        let Some(path) = &self.path else {
            f(&mut self.data.write());
            return;
        };

        let (revision, snapshot) = {
            let mut data = self.data.write();
            f(&mut data);
            let revision = self.revision.fetch_add(1, Ordering::Relaxed) + 1;
            (revision, data.clone())
        };

        // Saves can finish out of order; never replace a newer document
        let mut persisted = self.persisted.lock();
        if revision <= *persisted {
            return;
        }
        match persistence::save(path, &snapshot) {
            Ok(()) => *persisted = revision,
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to save analytics data"),
        }
    }
}
