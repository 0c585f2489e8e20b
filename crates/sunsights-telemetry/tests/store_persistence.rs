//! Analytics survive a restart

use sunsights_core::{AnalysisResult, Emotion, Priority, Sentiment};
use sunsights_telemetry::{ActivityKind, AnalyticsStore};
use tempfile::TempDir;

fn praise() -> AnalysisResult {
    AnalysisResult {
        sentiment: Sentiment::Positive,
        sentiment_score: 88,
        emotion: Emotion::Joy,
        priority: Priority::Low,
        response_suggestions: vec!["Thanks!".to_string()],
    }
}

#[test]
fn test_new_file_is_seeded_and_written() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("analytics_data.json");

    let store = AnalyticsStore::open(&path);
    assert!(path.exists());
    assert_eq!(store.activities()[0].kind, ActivityKind::Info);
}

#[test]
fn test_counters_reload_after_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("analytics_data.json");

    {
        let store = AnalyticsStore::open(&path);
        store.record_analysis(&praise());
        store.record_bulk("feedback.xlsx", &[praise(), praise()]);
        store.record_error("Bulk Analysis Error", "Failed to read file");
    }

    let reopened = AnalyticsStore::open(&path);
    let summary = reopened.summary();
    assert_eq!(summary.total_analyses, 3);
    assert_eq!(summary.bulk_uploads, 1);
    assert_eq!(summary.average_sentiment, 88);
    assert!(summary.last_analysis_time.is_some());

    let activities = reopened.activities();
    assert_eq!(activities.len(), 4);
    assert_eq!(activities[0].title, "Bulk Analysis Error");
    assert_eq!(activities[3].title, "Welcome to Sunsights");

    assert_eq!(reopened.emotion_chart().datasets[0].data[0], 3);
}

#[test]
fn test_corrupt_file_starts_fresh() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("analytics_data.json");
    std::fs::write(&path, "not json at all").unwrap();

    let store = AnalyticsStore::open(&path);
    assert_eq!(store.summary().total_analyses, 0);

    store.record_analysis(&praise());
    assert_eq!(AnalyticsStore::open(&path).summary().total_analyses, 1);
}

#[test]
fn test_concurrent_writers_persist_the_latest_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("analytics_data.json");
    let store = AnalyticsStore::open(&path);

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..10 {
                    store.record_analysis(&praise());
                }
            });
        }
    });

    assert_eq!(store.summary().total_analyses, 80);
    assert_eq!(AnalyticsStore::open(&path).summary().total_analyses, 80);
}
