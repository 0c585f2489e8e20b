//! Server configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use sunsights_classifiers::ClassifierConfig;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Browser origins allowed to call the API with credentials
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Request body limit, uploads included
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Dashboard analytics document
    #[serde(default = "default_analytics_path")]
    pub analytics_path: PathBuf,

    /// Sentiment and emotion classifiers
    #[serde(default)]
    pub classifiers: ClassifierConfig,
}

impl ServerConfig {
    /// Load configuration from file, or use defaults if it does not exist
    pub fn load(config_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_path = config_path.as_ref();
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            Self::from_yaml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            max_upload_bytes: default_max_upload_bytes(),
            analytics_path: default_analytics_path(),
            classifiers: ClassifierConfig::default(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:3001".to_string(),
    ]
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_analytics_path() -> PathBuf {
    PathBuf::from("./data/analytics_data.json")
}
