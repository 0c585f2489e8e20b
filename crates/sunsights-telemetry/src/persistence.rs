//! JSON file persistence for the analytics store
//!
//! The whole document is rewritten on every save. Writes go to a sibling
//! temporary file that is renamed over the target, so a crash never leaves
//! a half-written document behind.

use crate::analytics::AnalyticsData;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use sunsights_core::Result;
use tracing::debug;

/// Read a stored document; `Ok(None)` if the file does not exist yet
pub fn load(path: &Path) -> Result<Option<AnalyticsData>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    let data = serde_json::from_str(&contents)?;
    debug!(path = %path.display(), "Loaded analytics data");
    Ok(Some(data))
}

/// Atomically replace the document at `path`
pub fn save(path: &Path, data: &AnalyticsData) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_vec_pretty(data)?;

    let tmp = tmp_path(path);
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(&json)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "analytics_data.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(load(&dir.path().join("absent.json")).unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parent_and_leaves_no_tmp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("analytics_data.json");

        let mut data = AnalyticsData::default();
        data.total_analyses = 7;
        save(&path, &data).unwrap();

        assert!(path.exists());
        assert!(!tmp_path(&path).exists());
        assert_eq!(load(&path).unwrap().unwrap().total_analyses, 7);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("analytics_data.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(load(&path).is_err());
    }

    #[test]
    fn test_reads_documents_without_chart_counters() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("analytics_data.json");
        fs::write(
            &path,
            r#"{
  "totalAnalyses": 12,
  "bulkUploads": 2,
  "averageSentiment": 75,
  "lastAnalysisTime": null,
  "activities": [
    {
      "title": "Welcome to Sunsights",
      "description": "Your sentiment analysis dashboard is ready",
      "time": "2024-03-01 09:30:00",
      "type": "info"
    }
  ]
}"#,
        )
        .unwrap();

        let data = load(&path).unwrap().unwrap();
        assert_eq!(data.total_analyses, 12);
        assert_eq!(data.average_sentiment, 75.0);
        assert_eq!(data.activities.len(), 1);
        assert!(data.emotion_counts.is_empty());
    }
}
