use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use self::fetcher::FetcherConfig;
use self::log::LogConfig;
use self::recite::ReciteConfig;
use self::storage::StorageConfig;
use self::store::StoreConfig;

pub mod fetcher;
pub mod log;
pub mod recite;
pub mod storage;
pub mod store;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read config failed: {0}")]
    Read(#[from] std::io::Error),

    #[error("parse config failed: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub storage: StorageConfig,
    pub recite: ReciteConfig,
    pub fetcher: FetcherConfig,
    pub log: LogConfig,
}

impl Config {
    /// Defaults, overridden by `RECITE_*` environment variables
    pub fn new() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config.normalize();
        config
    }

    /// Load a JSON config file, then apply environment overrides
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        let mut config: Config = serde_json::from_str(&data)?;
        config.apply_env();
        config.normalize();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = env::var("RECITE_DATABASE_URL") {
            self.store.database_url = url;
        }
        if let Some(max) = env::var("RECITE_DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.store.max_connections = max;
        }
        if let Ok(dir) = env::var("RECITE_AUDIO_DIR") {
            self.storage.word_mp3_dir = dir;
        }
        if let Ok(accent) = env::var("RECITE_DEFAULT_ACCENT") {
            self.recite.default_accent = accent;
        }
        if let Ok(raw) = env::var("RECITE_REVIEW_INTERVALS") {
            self.recite.review_intervals_days = raw
                .split(',')
                .filter_map(|v| v.trim().parse().ok())
                .collect();
        }
        if let Some(secs) = env::var("RECITE_FETCH_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.fetcher.timeout_seconds = secs;
        }
        if let Ok(filter) = env::var("RECITE_LOG_FILTER") {
            self.log.filter = filter;
        }
        if let Ok(enabled) = env::var("RECITE_REQUEST_LOG") {
            self.log.enable_request_log = matches!(enabled.as_str(), "1" | "true" | "yes");
        }
    }

    /// Replace empty or out-of-range values with their defaults
    pub fn normalize(&mut self) {
        self.store.normalize();
        self.storage.normalize();
        self.recite.normalize();
        self.fetcher.normalize();
        self.log.normalize();
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use recite_types::Accent;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.storage.word_mp3_dir, "store/word_mp3");
        assert_eq!(config.recite.review_intervals_days, vec![1, 2, 4, 7, 15, 30]);
        assert_eq!(config.recite.accent(), Accent::En);
        assert_eq!(config.fetcher.timeout_seconds, 8);
        assert!(!config.log.enable_request_log);
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"recite": {{"default_accent": "AM", "review_intervals_days": [3, 0, 3, -1, 9]}},
                "storage": {{"word_mp3_dir": ""}}}}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.recite.accent(), Accent::Am);
        assert_eq!(config.recite.default_accent, "am");
        assert_eq!(config.recite.review_intervals_days, vec![3, 9]);
        assert_eq!(config.storage.word_mp3_dir, "store/word_mp3");
        assert_eq!(config.store.max_connections, 5);
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse(_))));
    }
}
