use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "https://www.iciba.com".to_string()
}

fn default_timeout_seconds() -> u64 {
    8
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/141.0.0.0 Safari/537.36".to_string()
}

/// Outbound dictionary/audio HTTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub(crate) fn normalize(&mut self) {
        if self.base_url.trim().is_empty() {
            self.base_url = default_base_url();
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        if self.timeout_seconds == 0 {
            self.timeout_seconds = default_timeout_seconds();
        }
        if self.user_agent.trim().is_empty() {
            self.user_agent = default_user_agent();
        }
    }
}
